//! Per-post inputs: filename fields, engagement metadata, and the assembled row

pub mod filename;
pub mod metadata;
pub mod record;

pub use filename::PostName;
pub use metadata::{Engagement, Metadata, extract as extract_metadata};
pub use record::{ColorShare, PostRecord};
