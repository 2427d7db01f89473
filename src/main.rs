//! One cron-driven run: gate on daylight, fetch telemetry, update the
//! charge history, and paint a single frame on the strip.

use std::process;
use std::time::Duration;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use solarstrip::{
    daylight, render, ChargeHistory, Config, Daylight, Error, InverterClient, Strip, Ws281xStrip,
};

/// Rainbow sweeps run on the full-charge celebration.
const RAINBOW_ITERATIONS: u32 = 10;
/// Delay between rainbow frames.
const RAINBOW_FRAME_DELAY: Duration = Duration::from_millis(5);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // A user interrupt is not a failure: log it and leave the strip as-is.
    if let Err(err) = ctrlc::set_handler(|| {
        tracing::info!("interrupted, exiting");
        process::exit(0);
    }) {
        tracing::warn!("could not install interrupt handler: {err}");
    }

    if let Err(err) = run(&Config::default()) {
        tracing::error!("run failed: {err}");
        process::exit(1);
    }
}

fn run(cfg: &Config) -> Result<(), Error> {
    let mut strip = Ws281xStrip::open(&cfg.strip)?;

    let now = Utc::now().with_timezone(&cfg.timezone);
    let dim = match daylight::evaluate(cfg, now) {
        Daylight::Off => {
            tracing::info!("night window, blanking the strip");
            render::blank(&mut strip);
            return strip.show();
        }
        Daylight::Lit { dim } => dim,
    };

    let client = InverterClient::new(cfg.inverter_url.clone());
    let reading = client.reading(cfg.sample_count, cfg.sample_delay)?;
    tracing::info!(
        grid = reading.grid,
        solar = reading.solar,
        consumption = reading.consumption,
        battery_power = reading.battery_power,
        battery_percentage = reading.battery_percentage,
        dim,
        "telemetry"
    );

    let mut history = ChargeHistory::load(&cfg.history_path)?;
    if history.reached_full_charge(reading.battery_percentage) {
        tracing::info!("battery just reached full charge");
        render::rainbow_cycle(&mut strip, RAINBOW_ITERATIONS, RAINBOW_FRAME_DELAY)?;
        // Clear the staged rainbow; the next show happens after the
        // normal bars are drawn on top
        render::blank(&mut strip);
    }
    history.push(reading.battery_percentage);
    history.save(&cfg.history_path)?;

    render::draw(&mut strip, &reading, dim, cfg);
    strip.show()
}
