//! CLI commands for the palette registry and config files

use std::path::{Path, PathBuf};

use anyhow::bail;

use crate::config::ScanConfig;
use crate::palette::PaletteRegistry;

/// List every party with its palette colors
pub fn list(config: Option<&Path>) -> anyhow::Result<()> {
    let registry = match config {
        Some(path) => ScanConfig::from_toml_file(path)?.palettes,
        None => PaletteRegistry::bundled(),
    };

    for (party, palette) in registry.iter() {
        let colors: Vec<String> = palette.colors().iter().map(ToString::to_string).collect();
        println!("{party:<12} {}", colors.join(" "));
    }
    println!();
    println!("{} parties", registry.len());

    Ok(())
}

/// Write a default config to `destination`
pub fn init(destination: &Path, root: Option<&Path>, force: bool) -> anyhow::Result<()> {
    if destination.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            destination.display()
        );
    }

    let root = root.map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    ScanConfig::new(root).to_toml_file(destination)?;
    println!("Wrote {}", destination.display());

    Ok(())
}
