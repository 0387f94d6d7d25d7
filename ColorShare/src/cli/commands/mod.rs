use clap::Subcommand;
use std::path::PathBuf;

use crate::palette::Rgb;

pub mod execute;
pub mod inspect;
pub mod palettes;
pub mod scan;

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a dataset and write the color share table
    Scan {
        /// Config file (TOML); flags below override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Dataset root containing the `Database` directory
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Only scan these parties (repeatable; default: all known parties)
        #[arg(short, long = "party")]
        parties: Vec<String>,

        /// Per-channel tolerance (repeatable; default: 40)
        #[arg(short, long = "tolerance")]
        tolerances: Vec<u8>,

        /// Output table path, relative to the root unless absolute
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overlay directory, relative to the root unless absolute
        #[arg(long)]
        overlay_dir: Option<PathBuf>,

        /// Skip writing overlay images
        #[arg(long)]
        no_overlays: bool,

        /// Process images in parallel
        #[arg(long)]
        parallel: bool,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Match a single image against a palette
    Match {
        /// Image to analyze
        image: PathBuf,

        /// Party whose palette to use
        #[arg(short, long, required_unless_present = "colors")]
        party: Option<String>,

        /// Palette colors as `r,g,b` or `#RRGGBB` (repeatable)
        #[arg(long = "color", conflicts_with = "party")]
        colors: Vec<Rgb>,

        /// Per-channel tolerance (repeatable; default: 40)
        #[arg(short, long = "tolerance")]
        tolerances: Vec<u8>,

        /// Config file providing the palette registry
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write overlays for each tolerance into this directory
        #[arg(long)]
        overlay_dir: Option<PathBuf>,
    },

    /// Decode post image file names
    Decode {
        /// File names such as `2021-05-01_14-30-00_2.jpg`
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// List the known party palettes
    Palettes {
        /// Config file providing the palette registry
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a default config file
    Init {
        /// Where to write the config
        #[arg(default_value = "colorshare.toml")]
        destination: PathBuf,

        /// Dataset root to record in the config
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
