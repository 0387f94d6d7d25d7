//! Overlay rendering for visual QA of match masks
//!
//! Matched pixels are painted with a highlight color, everything else is
//! copied from the source. Overlays are written as
//! `{stem}_delta{tolerance}.{ext}` so several tolerances can share one directory.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb as Pixel, RgbImage};

use crate::error::{Error, Result};
use crate::matcher::MatchMask;
use crate::palette::Rgb;

/// Marker color painted over matched pixels.
pub const DEFAULT_HIGHLIGHT: Rgb = Rgb::new(252, 10, 228);

/// Copy `image` and paint every masked pixel with `highlight`.
///
/// # Errors
/// Returns [`Error::MaskSizeMismatch`] if the mask was computed for a different image size.
pub fn render_overlay(image: &RgbImage, mask: &MatchMask, highlight: Rgb) -> Result<RgbImage> {
    if mask.width() != image.width() || mask.height() != image.height() {
        return Err(Error::MaskSizeMismatch {
            mask_width: mask.width(),
            mask_height: mask.height(),
            image_width: image.width(),
            image_height: image.height(),
        });
    }

    let marker = Pixel(highlight.to_array());
    let mut overlay = image.clone();
    for (pixel, &hit) in overlay.pixels_mut().zip(mask.as_slice()) {
        if hit {
            *pixel = marker;
        }
    }
    Ok(overlay)
}

/// Overlay file name for `source` at `tolerance`.
///
/// Keeps the source extension; falls back to `png` when the source has none.
#[must_use]
pub fn overlay_file_name(source: &Path, tolerance: u8) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "png".to_string());
    format!("{stem}_delta{tolerance}.{ext}")
}

/// Render and save the overlay for one (image, tolerance) pair.
///
/// The overlay directory is created if missing. Existing overlays are replaced.
///
/// # Returns
/// The path of the written overlay.
pub fn write_overlay(
    image: &RgbImage,
    mask: &MatchMask,
    highlight: Rgb,
    source: &Path,
    tolerance: u8,
    overlay_dir: &Path,
) -> Result<PathBuf> {
    let overlay = render_overlay(image, mask, highlight)?;

    if !overlay_dir.is_dir() {
        fs::create_dir_all(overlay_dir).map_err(|source| Error::OverlayDirectory {
            path: overlay_dir.to_path_buf(),
            source,
        })?;
    }

    let path = overlay_dir.join(overlay_file_name(source, tolerance));
    overlay.save(&path).map_err(|e| Error::OverlayWrite {
        path: path.clone(),
        message: e.to_string(),
    })?;

    tracing::debug!("Wrote overlay {}", path.display());
    Ok(path)
}
