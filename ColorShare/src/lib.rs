//! # ColorShare
//!
//! Measures how much of each social media post image is covered by a
//! party's brand colors, and assembles those measurements with post metadata
//! into one table for downstream analysis.
//!
//! ## Pipeline
//!
//! For every image under `<root>/Database/<party>/jpg/`:
//!
//! 1. **Filename** - date, time and slideshow position from `{date}_{time}[_{slide}].jpg`
//! 2. **Metadata** - likes and comments from `<root>/Database/<party>/json/<stem>.json`
//! 3. **Matching** - share of pixels within a per-channel tolerance of any palette color
//! 4. **Overlay** - a copy of the image with matched pixels highlighted
//! 5. **Table** - one CSV row per image
//!
//! ## Quick Start
//!
//! ```no_run
//! use colorshare::prelude::*;
//!
//! let mut config = ScanConfig::new("~/Pictures/Database_CulturalAnalytics");
//! config.parties = vec!["csu".to_string()];
//!
//! let report = run_scan(&config)?;
//! println!("{} rows written to {}", report.records_written, report.table_path.display());
//! # Ok::<(), colorshare::Error>(())
//! ```
//!
//! ### Matching a Single Image
//!
//! ```
//! use colorshare::matcher::match_fraction;
//! use colorshare::palette::{Palette, Rgb};
//! use image::RgbImage;
//!
//! let image = RgbImage::from_pixel(8, 8, image::Rgb([224, 0, 26]));
//! let palette = Palette::new(vec![Rgb::new(224, 0, 26)]);
//! let result = match_fraction(&image, &palette, 40)?;
//! assert_eq!(result.fraction, 1.0);
//! # Ok::<(), colorshare::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `colorshare` command-line binary

pub mod config;
pub mod dataset;
pub mod error;
pub mod matcher;
pub mod overlay;
pub mod palette;
pub mod post;
pub mod scan;
pub mod table;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::ScanConfig;
    pub use crate::error::{Error, Result};
    pub use crate::matcher::{ColorMatch, MatchMask, match_all, match_fraction, match_mask};
    pub use crate::overlay::{DEFAULT_HIGHLIGHT, overlay_file_name, render_overlay, write_overlay};
    pub use crate::palette::{Palette, PaletteRegistry, Rgb};
    pub use crate::post::{ColorShare, Engagement, Metadata, PostName, PostRecord, extract_metadata};

    pub use crate::dataset::{
        ScanPhase, ScanProgress, SkippedFile, WalkOutcome, walk, walk_with_progress,
    };
    pub use crate::scan::{ScanReport, run_scan, run_scan_with_progress};
    pub use crate::table::{header, write_table};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
