//! CLI commands for inspecting single images and file names

use std::path::Path;

use anyhow::bail;

use crate::config::ScanConfig;
use crate::dataset::load_rgb;
use crate::matcher::match_all;
use crate::overlay::{DEFAULT_HIGHLIGHT, write_overlay};
use crate::palette::{Palette, PaletteRegistry, Rgb};
use crate::post::PostName;

const DEFAULT_TOLERANCE: u8 = 40;

/// Print the color share of one image at each tolerance
pub fn match_image(
    image_path: &Path,
    party: Option<&str>,
    colors: &[Rgb],
    tolerances: &[u8],
    config: Option<&Path>,
    overlay_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let (palette, highlight) = select_palette(party, colors, config)?;
    let tolerances = if tolerances.is_empty() {
        vec![DEFAULT_TOLERANCE]
    } else {
        tolerances.to_vec()
    };

    let image = load_rgb(image_path)?;
    let matches = match_all(&image, &palette, &tolerances)?;

    println!(
        "{} ({}x{}, {} colors)",
        image_path.display(),
        image.width(),
        image.height(),
        palette.len()
    );
    for color_match in &matches {
        println!(
            "  delta {:>3}: {:.4} ({} of {} pixels)",
            color_match.tolerance,
            color_match.fraction,
            color_match.mask.count(),
            color_match.mask.total()
        );
        if let Some(dir) = overlay_dir {
            let path = write_overlay(
                &image,
                &color_match.mask,
                highlight,
                image_path,
                color_match.tolerance,
                dir,
            )?;
            println!("             overlay: {}", path.display());
        }
    }

    Ok(())
}

fn select_palette(
    party: Option<&str>,
    colors: &[Rgb],
    config: Option<&Path>,
) -> anyhow::Result<(Palette, Rgb)> {
    let (registry, highlight) = match config {
        Some(path) => {
            let config = ScanConfig::from_toml_file(path)?;
            (config.palettes, config.highlight)
        }
        None => (PaletteRegistry::bundled(), DEFAULT_HIGHLIGHT),
    };

    let palette = match party {
        Some(party) => registry.require(party)?.clone(),
        None if !colors.is_empty() => Palette::new(colors.to_vec()),
        None => bail!("either --party or --color is required"),
    };
    if palette.is_empty() {
        bail!("palette has no colors");
    }
    Ok((palette, highlight))
}

/// Print the decoded fields of each file name
///
/// Every name is printed; the command fails if any of them is malformed.
pub fn decode(names: &[String]) -> anyhow::Result<()> {
    let mut failures = 0;

    for name in names {
        match PostName::decode(name) {
            Ok(post) => println!(
                "{name}: date={} time={} slideshow={} slide={}",
                post.date_string(),
                post.time,
                u8::from(post.is_slideshow),
                post.slide
            ),
            Err(e) => {
                println!("{name}: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} names could not be decoded", names.len());
    }
    Ok(())
}
