//! LED strip access behind a small trait.
//!
//! The renderer only needs three things from the hardware: the pixel
//! count, a way to stage one pixel, and a way to submit the staged frame.
//! [`Ws281xStrip`] (behind the `hardware` feature) drives a real WS281x
//! chain through `rs_ws281x`; [`MemoryStrip`] records frames in memory so
//! rendering and the animations can be exercised on any host.

use crate::color::Rgb;
use crate::error::Error;

/// An addressable LED strip, indexed `0..count()`.
pub trait Strip {
    /// Number of addressable pixels.
    fn count(&self) -> usize;

    /// Stage a color for one pixel. Out-of-range indices are ignored,
    /// so segments computed from extreme telemetry can safely run off
    /// the end of the strip.
    fn set_pixel(&mut self, index: usize, color: Rgb);

    /// Submit all staged colors to the device in one update.
    fn show(&mut self) -> Result<(), Error>;
}

/// In-memory strip used by tests and for running without LED hardware.
#[derive(Debug, Clone)]
pub struct MemoryStrip {
    pixels: Vec<Rgb>,
    shows: usize,
}

impl MemoryStrip {
    /// Create a strip with `count` pixels, all off.
    pub fn new(count: usize) -> Self {
        Self {
            pixels: vec![crate::color::BLACK; count],
            shows: 0,
        }
    }

    /// Currently staged pixel colors.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// How many frames have been submitted.
    pub fn shows(&self) -> usize {
        self.shows
    }
}

impl Strip for MemoryStrip {
    fn count(&self) -> usize {
        self.pixels.len()
    }

    fn set_pixel(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    fn show(&mut self) -> Result<(), Error> {
        self.shows += 1;
        Ok(())
    }
}

#[cfg(feature = "hardware")]
pub use hardware::Ws281xStrip;

#[cfg(feature = "hardware")]
mod hardware {
    use rs_ws281x::{ChannelBuilder, Controller, ControllerBuilder, StripType};

    use super::Strip;
    use crate::color::Rgb;
    use crate::config::StripConfig;
    use crate::error::Error;

    /// A WS281x chain on a Raspberry Pi PWM/DMA channel.
    pub struct Ws281xStrip {
        controller: Controller,
        channel: usize,
    }

    impl Ws281xStrip {
        /// Initialize the driver. Must run as root for DMA access.
        pub fn open(cfg: &StripConfig) -> Result<Self, Error> {
            let controller = ControllerBuilder::new()
                .freq(cfg.frequency)
                .dma(cfg.dma_channel)
                .channel(
                    cfg.channel,
                    ChannelBuilder::new()
                        .pin(cfg.pin)
                        .count(cfg.led_count as i32)
                        .strip_type(StripType::Ws2812)
                        .brightness(cfg.brightness)
                        .invert(cfg.invert)
                        .build(),
                )
                .build()?;
            Ok(Self {
                controller,
                channel: cfg.channel,
            })
        }
    }

    impl Strip for Ws281xStrip {
        fn count(&self) -> usize {
            self.controller.leds(self.channel).len()
        }

        fn set_pixel(&mut self, index: usize, color: Rgb) {
            let leds = self.controller.leds_mut(self.channel);
            if let Some(led) = leds.get_mut(index) {
                // rs_ws281x raw color order is [B, G, R, W]
                *led = [color.b, color.g, color.r, 0];
            }
        }

        fn show(&mut self) -> Result<(), Error> {
            self.controller.render()?;
            Ok(())
        }
    }
}
