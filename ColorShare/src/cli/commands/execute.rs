//! Command execution implementations

use super::Commands;
use super::scan::ScanArgs;
use super::{inspect, palettes, scan};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Scan {
                config,
                root,
                parties,
                tolerances,
                output,
                overlay_dir,
                no_overlays,
                parallel,
                quiet,
            } => scan::execute(&ScanArgs {
                config: config.as_deref(),
                root: root.as_deref(),
                parties,
                tolerances,
                output: output.as_deref(),
                overlay_dir: overlay_dir.as_deref(),
                no_overlays: *no_overlays,
                parallel: *parallel,
                quiet: *quiet,
            }),
            Commands::Match {
                image,
                party,
                colors,
                tolerances,
                config,
                overlay_dir,
            } => inspect::match_image(
                image,
                party.as_deref(),
                colors,
                tolerances,
                config.as_deref(),
                overlay_dir.as_deref(),
            ),
            Commands::Decode { names } => inspect::decode(names),
            Commands::Palettes { config } => palettes::list(config.as_deref()),
            Commands::Init {
                destination,
                root,
                force,
            } => palettes::init(destination, root.as_deref(), *force),
        }
    }
}
