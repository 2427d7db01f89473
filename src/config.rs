//! Fixed deployment configuration.
//!
//! There is no CLI surface and no environment lookup: the program is run
//! from cron on the device it was installed on, so every tunable is an
//! in-source constant collected into one immutable [`Config`] passed to
//! the components that need it.

use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

/// WS281x channel settings handed to the LED driver.
#[derive(Debug, Clone)]
pub struct StripConfig {
    /// Number of addressable pixels on the strip
    pub led_count: usize,
    /// GPIO pin connected to the pixels (18 uses PWM)
    pub pin: i32,
    /// LED signal frequency in hertz (usually 800 kHz)
    pub frequency: u32,
    /// DMA channel used to generate the signal
    pub dma_channel: i32,
    /// Hardware brightness, 0 (darkest) to 255 (brightest)
    pub brightness: u8,
    /// Invert the signal (NPN transistor level shift)
    pub invert: bool,
    /// PWM channel, 1 for GPIOs 13/19/41/45/53
    pub channel: usize,
}

/// Everything one run needs, fixed at deployment time.
#[derive(Debug, Clone)]
pub struct Config {
    /// LED strip geometry and driver settings
    pub strip: StripConfig,
    /// Base URL of the inverter's local Solar API
    pub inverter_url: String,
    /// Brightness factor applied to all colors during the day
    pub day_dim: f64,
    /// Brightness factor applied between sunset and sunrise
    pub night_dim: f64,
    /// Power (W) that fills a whole half-strip; scales every segment length
    pub max_consumption: f64,
    /// Number of telemetry samples to average per run
    pub sample_count: u32,
    /// Pause between successive samples
    pub sample_delay: Duration,
    /// Site latitude for the sunrise/sunset computation
    pub latitude: f64,
    /// Site longitude for the sunrise/sunset computation
    pub longitude: f64,
    /// Timezone of the wall clock driving the day/night gate
    pub timezone: Tz,
    /// Hour (inclusive) at which the hard night cutoff begins
    pub night_start_hour: u32,
    /// Hour (exclusive) at which the hard night cutoff ends
    pub night_end_hour: u32,
    /// Where the rolling battery charge history is persisted
    pub history_path: PathBuf,
}

impl Config {
    /// Midpoint of the strip, anchor for both halves of the display.
    pub fn mid(&self) -> usize {
        self.strip.led_count / 2
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strip: StripConfig {
                led_count: 104,
                pin: 18,
                frequency: 800_000,
                dma_channel: 10,
                brightness: 65,
                invert: false,
                channel: 0,
            },
            inverter_url: "http://192.168.178.62".to_string(),
            day_dim: 0.3,
            night_dim: 0.1,
            max_consumption: 10_000.0,
            sample_count: 1,
            sample_delay: Duration::from_secs(2),
            latitude: 0.0,
            longitude: 0.0,
            timezone: chrono_tz::CET,
            night_start_hour: 23,
            night_end_hour: 6,
            history_path: PathBuf::from("/home/pi/led/history.json"),
        }
    }
}
