//! CLI progress display utilities
//!
//! Step indicators and a progress bar wired to [`ScanProgress`] updates.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

use crate::dataset::{ScanPhase, ScanProgress};

/// Magnifying glass - for discovery
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Palette - for color matching
pub static PALETTE: Emoji<'_, '_> = Emoji("🎨 ", "");
/// Floppy disk - for writing the table
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

/// Print a step indicator: `[1/3] 🔍 Message...`
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

/// Progress bar style for per-image processing
///
/// Format: `2021-05-01_14-30-00.jpg [████████░░░░░░░░] 50/100`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .expect("valid template")
        .progress_chars("##-")
}

/// Progress bar that follows the processing phase of a scan.
///
/// Discovery and table writing are printed as steps; the bar is hidden when `quiet`.
pub struct ScanProgressBar {
    bar: ProgressBar,
    quiet: bool,
}

impl ScanProgressBar {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(0);
            bar.set_style(bar_style());
            bar
        };
        Self { bar, quiet }
    }

    /// Apply one progress update.
    pub fn update(&self, progress: &ScanProgress) {
        match progress.phase {
            ScanPhase::Discovering => {
                if !self.quiet {
                    print_step(1, 3, LOOKING_GLASS, "Discovering images...");
                }
            }
            ScanPhase::Processing => {
                if self.bar.length() != Some(progress.total as u64) {
                    if !self.quiet {
                        print_step(2, 3, PALETTE, "Matching palettes...");
                    }
                    self.bar.set_length(progress.total as u64);
                }
                self.bar.set_position(progress.current as u64);
                if let Some(ref name) = progress.current_file {
                    self.bar.set_message(name.clone());
                }
            }
            ScanPhase::WritingTable => {
                self.bar.finish_and_clear();
                if !self.quiet {
                    print_step(3, 3, DISK, "Writing table...");
                }
            }
            ScanPhase::Complete => self.bar.finish_and_clear(),
        }
    }
}
