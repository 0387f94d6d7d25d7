//! Types for dataset walk progress and outcomes

use std::path::PathBuf;

use crate::post::PostRecord;

/// Progress callback type for scan operations
pub type ScanProgressCallback<'a> = &'a (dyn Fn(&ScanProgress) + Sync + Send);

/// Progress information during a scan
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Current operation phase
    pub phase: ScanPhase,
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Current file being processed (if applicable)
    pub current_file: Option<String>,
}

impl ScanProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: ScanPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    /// Create a progress update with a file name
    #[must_use]
    pub fn with_file(phase: ScanPhase, current: usize, total: usize, file: impl Into<String>) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Phase of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// Enumerating party directories and images
    Discovering,
    /// Matching images, reading metadata, writing overlays
    Processing,
    /// Writing the output table
    WritingTable,
    /// Scan complete
    Complete,
}

impl ScanPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discovering => "Discovering images",
            Self::Processing => "Processing images",
            Self::WritingTable => "Writing table",
            Self::Complete => "Complete",
        }
    }
}

/// An image that produced no output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything a walk produced, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    /// One record per successfully processed image
    pub records: Vec<PostRecord>,
    /// Images that were skipped, with the reason
    pub skipped: Vec<SkippedFile>,
    /// Party directories that were processed
    pub parties: Vec<String>,
    /// Records emitted without a metadata file
    pub metadata_missing: usize,
    /// Records emitted despite an unreadable metadata file
    pub metadata_errors: usize,
    /// Overlay images written
    pub overlays_written: usize,
}

impl WalkOutcome {
    /// Number of images that were looked at.
    #[must_use]
    pub fn images_seen(&self) -> usize {
        self.records.len() + self.skipped.len()
    }
}
