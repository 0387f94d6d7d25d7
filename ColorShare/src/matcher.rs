//! Color matcher - per-pixel palette classification
//!
//! A pixel matches a palette color when every channel differs by at most the
//! tolerance. The match set is the union over all palette colors, so a pixel
//! close to two palette entries is still counted once.

use image::RgbImage;

use crate::error::{Error, Result};
use crate::palette::Palette;

/// Boolean grid with the dimensions of its source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl MatchMask {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at `(x, y)` is in the match set.
    ///
    /// Out-of-bounds coordinates are reported as unmatched.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[y as usize * self.width as usize + x as usize]
    }

    /// Row-major view of the mask.
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Number of matched pixels.
    #[must_use]
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&hit| hit).count()
    }

    /// Total pixel count (`width * height`).
    #[must_use]
    pub fn total(&self) -> usize {
        self.bits.len()
    }

    /// Matched share of the image, rounded to four decimals.
    ///
    /// # Errors
    /// Returns [`Error::EmptyImage`] for a zero-pixel mask.
    pub fn fraction(&self) -> Result<f64> {
        let total = self.total();
        if total == 0 {
            return Err(Error::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        Ok(round4(self.count() as f64 / total as f64))
    }
}

/// Result of matching one image against one palette at one tolerance.
#[derive(Debug, Clone)]
pub struct ColorMatch {
    pub tolerance: u8,
    /// Matched share in `[0, 1]`, four decimals.
    pub fraction: f64,
    pub mask: MatchMask,
}

/// Classify every pixel of `image` against `palette`.
#[must_use]
pub fn match_mask(image: &RgbImage, palette: &Palette, tolerance: u8) -> MatchMask {
    let bits = image
        .pixels()
        .map(|pixel| palette.matches(pixel.0, tolerance))
        .collect();

    MatchMask {
        width: image.width(),
        height: image.height(),
        bits,
    }
}

/// Compute the matched fraction and its mask.
///
/// # Errors
/// Returns [`Error::EmptyImage`] if the image has no pixels.
pub fn match_fraction(image: &RgbImage, palette: &Palette, tolerance: u8) -> Result<ColorMatch> {
    let mask = match_mask(image, palette, tolerance);
    let fraction = mask.fraction()?;
    Ok(ColorMatch {
        tolerance,
        fraction,
        mask,
    })
}

/// Run [`match_fraction`] once per tolerance, preserving tolerance order.
pub fn match_all(image: &RgbImage, palette: &Palette, tolerances: &[u8]) -> Result<Vec<ColorMatch>> {
    tolerances
        .iter()
        .map(|&tolerance| match_fraction(image, palette, tolerance))
        .collect()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
