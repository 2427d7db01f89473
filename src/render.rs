//! Segment layout, frame rendering, and the built-in animations.
//!
//! The strip is split at `mid = led_count / 2`. The battery bar grows
//! leftward from `mid`, its length proportional to the state of charge
//! and its hue encoding charge or discharge power. To the right of the
//! midpoint three bars are stacked back to back: solar (or consumption,
//! whichever binds), battery flow, and grid, each scaled against the same
//! full-half-strip wattage. Everything is staged pixel by pixel and
//! submitted with a single `show`.

use std::thread;
use std::time::Duration;

use crate::client::Reading;
use crate::color::{Rgb, BLACK};
use crate::config::Config;
use crate::error::Error;
use crate::history::FULL_CHARGE;
use crate::strip::Strip;

/// Hue in degrees shown while the battery is idle; yellow.
const BATTERY_IDLE_HUE: f64 = 50.0;
/// Battery power that swings the hue by the full [`BATTERY_HUE_SWING`].
const BATTERY_HUE_RANGE_WATTS: f64 = 4500.0;
/// Maximum hue offset, in degrees, at full charge or discharge power.
const BATTERY_HUE_SWING: f64 = 50.0;

/// Bar color shown when the battery is full, regardless of flow.
const FULL_CHARGE_COLOR: Rgb = Rgb::new(0, 100, 255);
/// Solar / consumption segment color.
const SOLAR_COLOR: Rgb = Rgb::new(255, 255, 0);
/// Battery flow segment color.
const BATTERY_FLOW_COLOR: Rgb = Rgb::new(0, 255, 0);
/// Midpoint marker color.
const MARKER_COLOR: Rgb = Rgb::new(255, 255, 255);

/// Color of the battery bar for the given flow and charge level.
///
/// Above [`FULL_CHARGE`] the bar turns a fixed cool blue. Otherwise the
/// hue shifts linearly off yellow with the charge (toward green) or
/// discharge (toward red) power; out-of-range powers push the hue past
/// the formula's nominal range and simply wrap around the wheel.
pub fn battery_color(battery_power: i64, percentage: f64, dim: f64) -> Rgb {
    if percentage > FULL_CHARGE {
        return FULL_CHARGE_COLOR.dim(dim);
    }
    let hue =
        BATTERY_IDLE_HUE + battery_power as f64 / BATTERY_HUE_RANGE_WATTS * BATTERY_HUE_SWING;
    Rgb::from_hsl(hue, 1.0, 0.5).dim(dim)
}

/// Pixel indices covered by the battery bar, anchored at `mid` and
/// growing leftward; `round(mid * percentage)` pixels, highest first.
pub fn battery_coverage(mid: usize, percentage: f64) -> impl Iterator<Item = usize> {
    let len = (mid as f64 * percentage).round().max(0.0) as usize;
    let len = len.min(mid);
    (mid + 1 - len..=mid).rev()
}

/// Length in pixels of a right-side segment showing `watts` of power.
pub fn segment_length(watts: f64, max_consumption: f64, mid: usize) -> usize {
    let len = (watts.abs() / max_consumption * mid as f64).round() as usize;
    len.min(mid)
}

/// Red while importing from the grid, blue while exporting.
pub fn grid_color(grid: i64, dim: f64) -> Rgb {
    if grid > 0 {
        Rgb::new(255, 0, 0).dim(dim)
    } else {
        Rgb::new(0, 0, 255).dim(dim)
    }
}

/// Stage one full telemetry frame. Does not call `show`; the caller
/// submits the frame as a single hardware update.
pub fn draw(strip: &mut impl Strip, reading: &Reading, dim: f64, cfg: &Config) {
    let mid = cfg.mid();

    let bar_color = battery_color(reading.battery_power, reading.battery_percentage, dim);
    for i in battery_coverage(mid, reading.battery_percentage) {
        strip.set_pixel(i, bar_color);
    }

    // When solar already covers the whole load, the consumption figure
    // takes the solar slot and no separate battery flow is shown.
    let (solar_shown, battery_shown) = if reading.consumption > reading.solar as f64 {
        (reading.solar as f64, reading.battery_power)
    } else {
        (reading.consumption, 0)
    };

    let solar_len = segment_length(solar_shown, cfg.max_consumption, mid);
    let battery_len = segment_length(battery_shown as f64, cfg.max_consumption, mid);
    let grid_len = segment_length(reading.grid as f64, cfg.max_consumption, mid);

    // Each bar starts where the previous one ended; zero-length bars
    // collapse so the chain stays gapless.
    let solar_start = mid + 1;
    let battery_start = solar_start + solar_len;
    let grid_start = battery_start + battery_len;

    fill(strip, solar_start, solar_len, SOLAR_COLOR.dim(dim));
    fill(strip, battery_start, battery_len, BATTERY_FLOW_COLOR.dim(dim));
    fill(strip, grid_start, grid_len, grid_color(reading.grid, dim));

    strip.set_pixel(mid - 1, MARKER_COLOR.dim(dim));
}

/// Stage black on every pixel without submitting the frame.
pub fn blank(strip: &mut impl Strip) {
    for i in 0..strip.count() {
        strip.set_pixel(i, BLACK);
    }
}

fn fill(strip: &mut impl Strip, start: usize, len: usize, color: Rgb) {
    for i in start..start + len {
        strip.set_pixel(i, color);
    }
}

/// Reveal `color` across the given pixels one at a time, submitting a
/// frame per pixel.
pub fn color_wipe(
    strip: &mut impl Strip,
    color: Rgb,
    pixels: impl IntoIterator<Item = usize>,
    frame_delay: Duration,
) -> Result<(), Error> {
    for i in pixels {
        strip.set_pixel(i, color);
        strip.show()?;
        thread::sleep(frame_delay);
    }
    Ok(())
}

/// Sweep a uniformly distributed rainbow across the whole strip,
/// `256 * iterations` frames in total.
pub fn rainbow_cycle(
    strip: &mut impl Strip,
    iterations: u32,
    frame_delay: Duration,
) -> Result<(), Error> {
    let count = strip.count();
    if count == 0 {
        return Ok(());
    }
    for step in 0..256 * iterations {
        for i in 0..count {
            let pos = (i * 256 / count + step as usize) as u8;
            strip.set_pixel(i, wheel(pos));
        }
        strip.show()?;
        thread::sleep(frame_delay);
    }
    Ok(())
}

/// Three-segment piecewise-linear hue wheel over 0-255.
fn wheel(pos: u8) -> Rgb {
    match pos {
        0..=84 => Rgb::new(pos * 3, 255 - pos * 3, 0),
        85..=169 => {
            let pos = pos - 85;
            Rgb::new(255 - pos * 3, 0, pos * 3)
        }
        170..=255 => {
            let pos = pos - 170;
            Rgb::new(0, pos * 3, 255 - pos * 3)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strip::MemoryStrip;

    fn reading(grid: i64, solar: i64, consumption: f64, battery_power: i64, pct: f64) -> Reading {
        Reading {
            grid,
            solar,
            consumption,
            battery_power,
            battery_percentage: pct,
        }
    }

    #[test]
    fn test_battery_coverage_length_and_bounds() {
        let mid = 52;
        for pct in [0.0, 0.1, 0.25, 0.5, 0.75, 0.98, 1.0] {
            let pixels: Vec<usize> = battery_coverage(mid, pct).collect();
            assert_eq!(pixels.len(), (mid as f64 * pct).round() as usize);
            assert!(pixels.iter().all(|&i| i <= mid));
        }
    }

    #[test]
    fn test_battery_coverage_grows_leftward_from_mid() {
        let pixels: Vec<usize> = battery_coverage(52, 0.5).collect();
        assert_eq!(pixels.first(), Some(&52));
        assert_eq!(pixels.last(), Some(&27));
    }

    #[test]
    fn test_battery_coverage_clamps_extremes() {
        assert_eq!(battery_coverage(52, -0.5).count(), 0);
        assert_eq!(battery_coverage(52, 2.0).count(), 52);
    }

    #[test]
    fn test_battery_color_idle_is_yellow() {
        assert_eq!(
            battery_color(0, 0.5, 1.0),
            Rgb::from_hsl(50.0, 1.0, 0.5)
        );
    }

    #[test]
    fn test_battery_color_hue_shifts_with_power() {
        assert_eq!(
            battery_color(4500, 0.5, 1.0),
            Rgb::from_hsl(100.0, 1.0, 0.5)
        );
        assert_eq!(
            battery_color(-4500, 0.5, 1.0),
            Rgb::from_hsl(0.0, 1.0, 0.5)
        );
    }

    #[test]
    fn test_battery_color_full_charge_overrides_power() {
        let dim = 0.3;
        let expected = Rgb::new(0, 100, 255).dim(dim);
        assert_eq!(battery_color(0, 0.99, dim), expected);
        assert_eq!(battery_color(9_999, 0.99, dim), expected);
        assert_eq!(battery_color(-9_999, 1.0, dim), expected);
        // At the threshold the hue formula still applies
        assert_ne!(battery_color(0, 0.98, dim), expected);
    }

    #[test]
    fn test_segment_length_rounds() {
        let mid = 52;
        assert_eq!(segment_length(0.0, 10_000.0, mid), 0);
        assert_eq!(segment_length(10_000.0, 10_000.0, mid), 52);
        assert_eq!(segment_length(-10_000.0, 10_000.0, mid), 52);
        assert_eq!(segment_length(962.0, 10_000.0, mid), 5);
        assert_eq!(segment_length(577.0, 10_000.0, mid), 3);
    }

    #[test]
    fn test_grid_color_import_export() {
        assert_eq!(grid_color(100, 1.0), Rgb::new(255, 0, 0));
        assert_eq!(grid_color(-100, 1.0), Rgb::new(0, 0, 255));
        assert_eq!(grid_color(0, 1.0), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_segment_chaining_with_zero_solar() {
        // solar length 0, battery length 5, grid length 3 at mid 52:
        // battery occupies [53, 58), grid [58, 61)
        let cfg = Config::default();
        let mut strip = MemoryStrip::new(cfg.strip.led_count);
        let r = reading(577, 0, 1.0, 962, 0.0);
        draw(&mut strip, &r, 1.0, &cfg);

        let green = Rgb::new(0, 255, 0);
        let red = Rgb::new(255, 0, 0);
        for i in 53..58 {
            assert_eq!(strip.pixels()[i], green, "pixel {i}");
        }
        for i in 58..61 {
            assert_eq!(strip.pixels()[i], red, "pixel {i}");
        }
        assert_eq!(strip.pixels()[61], BLACK);
    }

    #[test]
    fn test_segment_chaining_all_zero_anchors_grid_at_mid_plus_one() {
        let cfg = Config::default();
        let mut strip = MemoryStrip::new(cfg.strip.led_count);
        let r = reading(577, 0, 1.0, 0, 0.0);
        draw(&mut strip, &r, 1.0, &cfg);

        let red = Rgb::new(255, 0, 0);
        for i in 53..56 {
            assert_eq!(strip.pixels()[i], red, "pixel {i}");
        }
        assert_eq!(strip.pixels()[56], BLACK);
    }

    #[test]
    fn test_solar_limited_consumption_hides_battery_flow() {
        // consumption <= solar: consumption takes the solar slot and the
        // battery flow segment vanishes
        let cfg = Config::default();
        let mut strip = MemoryStrip::new(cfg.strip.led_count);
        let r = reading(-1000, 5000, 2000.0, 3000, 0.0);
        draw(&mut strip, &r, 1.0, &cfg);

        let yellow = Rgb::new(255, 255, 0);
        let blue = Rgb::new(0, 0, 255);
        // 2000 W -> round(2000 / 10000 * 52) = 10 pixels of consumption
        for i in 53..63 {
            assert_eq!(strip.pixels()[i], yellow, "pixel {i}");
        }
        // no green battery segment in between: the export segment starts
        // right where the consumption bar ended
        for i in 63..68 {
            assert_eq!(strip.pixels()[i], blue, "pixel {i}");
        }
        assert_eq!(strip.pixels()[68], BLACK);
    }

    #[test]
    fn test_draw_places_midpoint_marker() {
        let cfg = Config::default();
        let mut strip = MemoryStrip::new(cfg.strip.led_count);
        let r = reading(0, 0, 0.0, 0, 1.0);
        draw(&mut strip, &r, 0.3, &cfg);
        assert_eq!(strip.pixels()[51], Rgb::new(255, 255, 255).dim(0.3));
        // the rest of the battery bar keeps the full-charge color
        assert_eq!(strip.pixels()[52], Rgb::new(0, 100, 255).dim(0.3));
        assert_eq!(strip.pixels()[50], Rgb::new(0, 100, 255).dim(0.3));
    }

    #[test]
    fn test_draw_stages_without_showing() {
        let cfg = Config::default();
        let mut strip = MemoryStrip::new(cfg.strip.led_count);
        draw(&mut strip, &reading(0, 0, 0.0, 0, 0.5), 1.0, &cfg);
        assert_eq!(strip.shows(), 0);
    }

    #[test]
    fn test_blank_clears_all_pixels() {
        let mut strip = MemoryStrip::new(16);
        for i in 0..16 {
            strip.set_pixel(i, Rgb::new(9, 9, 9));
        }
        blank(&mut strip);
        assert!(strip.pixels().iter().all(|&p| p == BLACK));
        assert_eq!(strip.shows(), 0);
    }

    #[test]
    fn test_wheel_segment_boundaries() {
        assert_eq!(wheel(0), Rgb::new(0, 255, 0));
        assert_eq!(wheel(84), Rgb::new(252, 3, 0));
        assert_eq!(wheel(85), Rgb::new(255, 0, 0));
        assert_eq!(wheel(169), Rgb::new(3, 0, 252));
        assert_eq!(wheel(170), Rgb::new(0, 0, 255));
        assert_eq!(wheel(255), Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_color_wipe_shows_per_pixel() {
        let mut strip = MemoryStrip::new(8);
        color_wipe(&mut strip, Rgb::new(1, 1, 1), 0..8, Duration::ZERO).unwrap();
        assert_eq!(strip.shows(), 8);
        assert!(strip.pixels().iter().all(|&p| p == Rgb::new(1, 1, 1)));
    }

    #[test]
    fn test_rainbow_cycle_frame_count() {
        let mut strip = MemoryStrip::new(4);
        rainbow_cycle(&mut strip, 2, Duration::ZERO).unwrap();
        assert_eq!(strip.shows(), 512);
    }
}
