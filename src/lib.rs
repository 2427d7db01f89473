//! # solarstrip
//!
//! Renders a Fronius solar inverter's live telemetry on a WS281x LED
//! strip. Meant to run from cron on a Raspberry Pi wired to the strip:
//! each invocation fetches one set of readings, paints one frame, and
//! exits.
//!
//! The strip is anchored at its midpoint:
//! - **left half** — battery state of charge, growing leftward; the hue
//!   encodes charge (greenish) or discharge (reddish) power, and a full
//!   battery turns the bar a fixed cool blue
//! - **right half** — stacked bars for solar (or consumption, whichever
//!   binds), battery flow, and grid import/export
//!
//! Brightness follows the sun: full configured brightness between
//! sunrise and sunset, dimmed outside it, and a hard night window during
//! which the strip is blanked and the run ends before any telemetry is
//! fetched.
//!
//! A short battery charge history persisted across runs detects the
//! first sample above full charge and celebrates it with a rainbow sweep
//! before the normal frame is drawn.
//!
//! ## Rendering without hardware
//!
//! ```
//! use solarstrip::{render, Config, MemoryStrip, Reading, Strip};
//!
//! let cfg = Config::default();
//! let mut strip = MemoryStrip::new(cfg.strip.led_count);
//! let reading = Reading {
//!     grid: 120,
//!     solar: 2_400,
//!     consumption: 2_520.0,
//!     battery_power: -350,
//!     battery_percentage: 0.8,
//! };
//! render::draw(&mut strip, &reading, cfg.day_dim, &cfg);
//! strip.show().unwrap();
//! ```
//!
//! ## Feature flags
//!
//! - `hardware` - the `rs_ws281x` driver and the `solarstrip` binary
//!   (Raspberry Pi only; everything else builds and tests on any host)

pub mod client;
pub mod color;
pub mod config;
pub mod daylight;
mod error;
pub mod history;
pub mod render;
pub mod strip;

pub use client::{InverterClient, PowerFlow, Reading, StorageController};
pub use config::{Config, StripConfig};
pub use daylight::Daylight;
pub use error::Error;
pub use history::{ChargeHistory, FULL_CHARGE};
pub use strip::{MemoryStrip, Strip};

#[cfg(feature = "hardware")]
pub use strip::Ws281xStrip;
