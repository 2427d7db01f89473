//! Color primitives and HSL conversion.
//!
//! The renderer works in HSL for the battery bar (hue encodes charge or
//! discharge power) and converts to packed RGB for the driver. Conversion
//! goes through `palette`, which wraps out-of-range hues instead of
//! clamping them; extreme battery power readings therefore shift the hue
//! around the wheel rather than producing an error.

use palette::{FromColor, Hsl, Srgb};

/// A packed RGB pixel color, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

/// All channels off.
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

impl Rgb {
    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by a brightness factor in `(0, 1]`.
    ///
    /// # Example
    ///
    /// ```
    /// use solarstrip::color::Rgb;
    ///
    /// assert_eq!(Rgb::new(255, 100, 0).dim(0.3), Rgb::new(76, 30, 0));
    /// ```
    pub fn dim(self, factor: f64) -> Self {
        Self {
            r: (f64::from(self.r) * factor) as u8,
            g: (f64::from(self.g) * factor) as u8,
            b: (f64::from(self.b) * factor) as u8,
        }
    }

    /// Convert an HSL color to RGB.
    ///
    /// `hue` is in degrees and may fall outside `[0, 360)`; it wraps.
    /// `saturation` and `lightness` are fractions in `[0, 1]`.
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let hsl = Hsl::new(hue as f32, saturation as f32, lightness as f32);
        let (r, g, b) = Srgb::from_color(hsl).into_format::<u8>().into_components();
        Self { r, g, b }
    }
}
