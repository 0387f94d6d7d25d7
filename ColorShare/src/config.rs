//! Scan configuration (`colorshare.toml`)
//!
//! Every option of a run lives here: the project root, which parties to
//! process, the palette registry, the tolerance list, and where the table and
//! overlays go. Relative output paths resolve against the project root.
//!
//! ```toml
//! root = "~/Pictures/Database_CulturalAnalytics"
//! parties = ["csu"]
//! tolerances = [40]
//!
//! [palettes]
//! csu = [[154, 201, 21], [33, 131, 206]]
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::DATABASE_DIR;
use crate::error::{Error, Result};
use crate::overlay::DEFAULT_HIGHLIGHT;
use crate::palette::{PaletteRegistry, Rgb};

fn default_tolerances() -> Vec<u8> {
    vec![40]
}

fn default_output() -> PathBuf {
    PathBuf::from("output.csv")
}

fn default_overlay_dir() -> PathBuf {
    PathBuf::from("Overlay_Images")
}

fn default_true() -> bool {
    true
}

fn default_highlight() -> Rgb {
    DEFAULT_HIGHLIGHT
}

fn default_image_extensions() -> Vec<String> {
    vec!["jpg".to_string(), "jpeg".to_string()]
}

/// Full configuration of one scan run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Project root containing the `Database` directory. `~` is expanded.
    pub root: PathBuf,
    /// Parties to process. Empty selects every party in the registry.
    #[serde(default)]
    pub parties: Vec<String>,
    /// Tolerances to evaluate, one output column each, in this order.
    #[serde(default = "default_tolerances")]
    pub tolerances: Vec<u8>,
    /// Output table path.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Overlay root; a scan writes one subdirectory per party.
    #[serde(default = "default_overlay_dir")]
    pub overlay_dir: PathBuf,
    /// Write one overlay per (image, tolerance).
    #[serde(default = "default_true")]
    pub write_overlays: bool,
    /// Marker color for matched pixels in overlays.
    #[serde(default = "default_highlight")]
    pub highlight: Rgb,
    /// Image file extensions to process (case-insensitive, without dot).
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
    /// Process images of a party on the rayon pool.
    #[serde(default)]
    pub parallel: bool,
    /// Party palettes; the bundled registry when omitted.
    #[serde(default = "PaletteRegistry::bundled")]
    pub palettes: PaletteRegistry,
}

impl ScanConfig {
    /// Default configuration rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            parties: Vec::new(),
            tolerances: default_tolerances(),
            output: default_output(),
            overlay_dir: default_overlay_dir(),
            write_overlays: true,
            highlight: DEFAULT_HIGHLIGHT,
            image_extensions: default_image_extensions(),
            parallel: false,
            palettes: PaletteRegistry::bundled(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Render configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Save configuration to a TOML file.
    pub fn to_toml_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Project root with `~` expanded.
    #[must_use]
    pub fn root_dir(&self) -> PathBuf {
        let raw = self.root.to_string_lossy();
        PathBuf::from(shellexpand::tilde(&raw).as_ref())
    }

    #[must_use]
    pub fn database_dir(&self) -> PathBuf {
        self.root_dir().join(DATABASE_DIR)
    }

    /// Output table path, resolved against the root when relative.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.root_dir().join(&self.output)
    }

    /// Overlay directory, resolved against the root when relative.
    #[must_use]
    pub fn overlay_path(&self) -> PathBuf {
        self.root_dir().join(&self.overlay_dir)
    }

    /// The effective party selection.
    #[must_use]
    pub fn selected_parties(&self) -> Vec<String> {
        if self.parties.is_empty() {
            self.palettes.parties().map(str::to_string).collect()
        } else {
            self.parties.clone()
        }
    }

    /// Whether `path` has one of the configured image extensions.
    #[must_use]
    pub fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .is_some_and(|ext| {
                self.image_extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext))
            })
    }

    /// Check the configuration before any file is touched.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] for an empty or duplicated tolerance
    /// list, an empty extension list, or an empty palette, and
    /// [`Error::MissingPalette`] when a selected party has no palette.
    pub fn validate(&self) -> Result<()> {
        if self.tolerances.is_empty() {
            return Err(Error::InvalidConfig("at least one tolerance is required".to_string()));
        }

        let mut seen = HashSet::new();
        for tolerance in &self.tolerances {
            if !seen.insert(tolerance) {
                return Err(Error::InvalidConfig(format!(
                    "tolerance {tolerance} is listed twice"
                )));
            }
        }

        if self.image_extensions.is_empty() {
            return Err(Error::InvalidConfig("no image extensions configured".to_string()));
        }

        let parties = self.selected_parties();
        if parties.is_empty() {
            return Err(Error::InvalidConfig("no parties selected".to_string()));
        }
        for party in &parties {
            if self.palettes.require(party)?.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "palette for party '{party}' has no colors"
                )));
            }
        }

        Ok(())
    }
}
