//! CLI command for full dataset scans

use std::path::Path;
use std::time::Instant;

use anyhow::bail;

use crate::cli::progress::{ScanProgressBar, print_done};
use crate::config::ScanConfig;
use crate::dataset::ScanProgress;
use crate::scan::{ScanReport, run_scan_with_progress};

/// Flags of the `scan` command
pub struct ScanArgs<'a> {
    pub config: Option<&'a Path>,
    pub root: Option<&'a Path>,
    pub parties: &'a [String],
    pub tolerances: &'a [u8],
    pub output: Option<&'a Path>,
    pub overlay_dir: Option<&'a Path>,
    pub no_overlays: bool,
    pub parallel: bool,
    pub quiet: bool,
}

/// Build the effective config: file first, then flag overrides.
pub fn resolve_config(args: &ScanArgs) -> anyhow::Result<ScanConfig> {
    let mut config = match (args.config, args.root) {
        (Some(path), _) => ScanConfig::from_toml_file(path)?,
        (None, Some(root)) => ScanConfig::new(root),
        (None, None) => bail!("either --config or --root is required"),
    };

    if let Some(root) = args.root {
        config.root = root.to_path_buf();
    }
    if !args.parties.is_empty() {
        config.parties = args.parties.to_vec();
    }
    if !args.tolerances.is_empty() {
        config.tolerances = args.tolerances.to_vec();
    }
    if let Some(output) = args.output {
        config.output = output.to_path_buf();
    }
    if let Some(overlay_dir) = args.overlay_dir {
        config.overlay_dir = overlay_dir.to_path_buf();
    }
    if args.no_overlays {
        config.write_overlays = false;
    }
    if args.parallel {
        config.parallel = true;
    }

    Ok(config)
}

/// Run a scan and print a summary
pub fn execute(args: &ScanArgs) -> anyhow::Result<()> {
    let config = resolve_config(args)?;
    let start = Instant::now();

    let bar = ScanProgressBar::new(args.quiet);
    let report = run_scan_with_progress(&config, &|p: &ScanProgress| bar.update(p))?;

    if !args.quiet {
        print_summary(&report);
        print_done(start.elapsed());
    }

    Ok(())
}

fn print_summary(report: &ScanReport) {
    println!();
    println!("Parties: {}", report.parties.join(", "));
    println!(
        "Processed {} of {} images ({} skipped)",
        report.records_written,
        report.total_files(),
        report.skipped.len()
    );
    if report.metadata_missing > 0 || report.metadata_errors > 0 {
        println!(
            "Metadata: {} missing, {} unreadable",
            report.metadata_missing, report.metadata_errors
        );
    }
    println!("Table: {}", report.table_path.display());
    if let Some(ref overlay_dir) = report.overlay_dir {
        println!("Overlays: {} in {}", report.overlays_written, overlay_dir.display());
    }

    if !report.skipped.is_empty() {
        println!();
        println!("Skipped files:");
        for skipped in &report.skipped {
            println!("  {}: {}", skipped.path.display(), skipped.reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args<'a>(root: &'a Path) -> ScanArgs<'a> {
        ScanArgs {
            config: None,
            root: Some(root),
            parties: &[],
            tolerances: &[],
            output: None,
            overlay_dir: None,
            no_overlays: false,
            parallel: false,
            quiet: true,
        }
    }

    #[test]
    fn test_flags_override_defaults() {
        let parties = vec!["spdde".to_string()];
        let mut args = args(Path::new("/data"));
        args.parties = &parties;
        args.tolerances = &[30, 50];
        args.no_overlays = true;

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.root, Path::new("/data"));
        assert_eq!(config.parties, parties);
        assert_eq!(config.tolerances, vec![30, 50]);
        assert!(!config.write_overlays);
        assert!(!config.parallel);
    }

    #[test]
    fn test_requires_root_or_config() {
        let mut args = args(Path::new("/data"));
        args.root = None;
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn test_config_file_then_flags() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("colorshare.toml");
        let mut file_config = ScanConfig::new("/from/file");
        file_config.tolerances = vec![20];
        file_config.to_toml_file(&path).unwrap();

        let mut args = args(Path::new("/ignored"));
        args.root = None;
        args.config = Some(&path);
        args.parallel = true;

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.root, Path::new("/from/file"));
        assert_eq!(config.tolerances, vec![20]);
        assert!(config.parallel);
    }
}
