//! Dataset traversal - `Database/<party>/{jpg,json}` to post records
//!
//! This module walks the fixed project layout:
//!
//! ```text
//! <root>/Database/<party>/jpg/<date>_<time>[_<slide>].jpg
//! <root>/Database/<party>/json/<same stem>.json
//! ```

pub mod types;
mod walker;

pub use types::{ScanPhase, ScanProgress, ScanProgressCallback, SkippedFile, WalkOutcome};
pub use walker::{find_images, find_party_dirs, metadata_path_for, walk, walk_with_progress};
pub(crate) use walker::load_rgb;

/// Name of the database directory under the project root.
pub const DATABASE_DIR: &str = "Database";
/// Image subfolder of each party directory.
pub const IMAGE_DIR: &str = "jpg";
/// Metadata subfolder of each party directory.
pub const METADATA_DIR: &str = "json";
