//! End-to-end scan: walk the dataset, then write the output table
//!
//! The table is only written after the walk succeeds, so a fatal error (for
//! example a missing `Database` directory) leaves no partial output behind.

use std::path::PathBuf;

use crate::config::ScanConfig;
use crate::dataset::{ScanPhase, ScanProgress, ScanProgressCallback, SkippedFile, walk_with_progress};
use crate::error::Result;
use crate::table::write_table;

/// Summary of a finished scan
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Rows written to the table
    pub records_written: usize,
    /// Images that produced no row
    pub skipped: Vec<SkippedFile>,
    /// Party directories that were processed
    pub parties: Vec<String>,
    /// Rows without a metadata file
    pub metadata_missing: usize,
    /// Rows whose metadata file was unreadable
    pub metadata_errors: usize,
    /// Overlay images written
    pub overlays_written: usize,
    /// Where the table was written
    pub table_path: PathBuf,
    /// Where overlays were written, if enabled
    pub overlay_dir: Option<PathBuf>,
}

impl ScanReport {
    /// Images processed plus images skipped.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.records_written + self.skipped.len()
    }
}

/// Run a scan without progress reporting.
pub fn run_scan(config: &ScanConfig) -> Result<ScanReport> {
    run_scan_with_progress(config, &|_| {})
}

/// Run a scan with a progress callback.
///
/// # Errors
/// Returns configuration and database errors from the walk, and IO errors
/// from writing the table. Per-image failures are reported in
/// [`ScanReport::skipped`] instead.
pub fn run_scan_with_progress(config: &ScanConfig, progress: ScanProgressCallback) -> Result<ScanReport> {
    tracing::info!("Scanning {}", config.database_dir().display());

    let outcome = walk_with_progress(config, progress)?;

    let table_path = config.output_path();
    progress(&ScanProgress::with_file(
        ScanPhase::WritingTable,
        0,
        1,
        table_path.display().to_string(),
    ));
    let records_written = write_table(&table_path, &outcome.records, &config.tolerances)?;

    progress(&ScanProgress::new(ScanPhase::Complete, 1, 1));

    Ok(ScanReport {
        records_written,
        skipped: outcome.skipped,
        parties: outcome.parties,
        metadata_missing: outcome.metadata_missing,
        metadata_errors: outcome.metadata_errors,
        overlays_written: outcome.overlays_written,
        table_path,
        overlay_dir: config.write_overlays.then(|| config.overlay_path()),
    })
}
