//! Day/night gating and brightness selection.
//!
//! Two layers: a hard night window during which the strip stays dark and
//! the run stops before any telemetry is fetched, and a sunrise/sunset
//! comparison that picks the dim factor for the rest of the day. The
//! night window is checked first and skips the sunrise computation
//! entirely.

use chrono::{DateTime, Datelike, Timelike};
use chrono_tz::Tz;

use crate::config::Config;

/// Outcome of the daylight check for the current wall clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Daylight {
    /// Deep night window: blank the strip and end the run.
    Off,
    /// Render with the given brightness factor.
    Lit {
        /// Multiplier applied to every color channel
        dim: f64,
    },
}

/// Decide whether and how bright to render at `now`.
pub fn evaluate(cfg: &Config, now: DateTime<Tz>) -> Daylight {
    if in_night_window(now.hour(), cfg.night_start_hour, cfg.night_end_hour) {
        return Daylight::Off;
    }

    let (sunrise_ts, sunset_ts) = sunrise::sunrise_sunset(
        cfg.latitude,
        cfg.longitude,
        now.year(),
        now.month(),
        now.day(),
    );

    Daylight::Lit {
        dim: dim_for(now.timestamp(), sunrise_ts, sunset_ts, cfg),
    }
}

/// The hard cutoff window wraps midnight: `[start, 24) ∪ [0, end)`.
fn in_night_window(hour: u32, start: u32, end: u32) -> bool {
    hour >= start || hour < end
}

/// Night dim before sunrise or after sunset, day dim in between.
fn dim_for(now_ts: i64, sunrise_ts: i64, sunset_ts: i64, cfg: &Config) -> f64 {
    if now_ts < sunrise_ts || now_ts > sunset_ts {
        cfg.night_dim
    } else {
        cfg.day_dim
    }
}
