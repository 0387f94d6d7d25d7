//! Dataset walker
//!
//! Enumerates selected party directories, then runs every image through
//! filename decoding, metadata extraction, color matching and overlay
//! rendering. Per-image failures are logged and collected; only a missing
//! database directory or an invalid configuration stops the walk.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{ImageReader, RgbImage};
use rayon::prelude::*;
use walkdir::WalkDir;

use super::types::{ScanPhase, ScanProgress, ScanProgressCallback, SkippedFile, WalkOutcome};
use super::{IMAGE_DIR, METADATA_DIR};
use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::matcher::match_all;
use crate::overlay::write_overlay;
use crate::palette::Palette;
use crate::post::{ColorShare, Metadata, PostName, PostRecord, extract_metadata};

/// One image queued for processing.
struct ImageTask<'a> {
    party: &'a str,
    palette: &'a Palette,
    path: PathBuf,
}

/// How metadata lookup went for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetadataStatus {
    Found,
    Missing,
    Malformed,
}

/// A successfully processed image.
struct Processed {
    record: PostRecord,
    metadata: MetadataStatus,
    overlays_written: usize,
}

/// Find party directories under `database` whose name is in `selected`.
///
/// # Returns
/// `(party, path)` pairs sorted by directory name.
pub fn find_party_dirs(database: &Path, selected: &[String]) -> Result<Vec<(String, PathBuf)>> {
    let mut parties = Vec::new();

    for entry in WalkDir::new(database)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if selected.iter().any(|party| *party == name) {
            parties.push((name, entry.path().to_path_buf()));
        }
    }

    Ok(parties)
}

/// Find image files directly inside `image_dir`, sorted by file name.
///
/// Unreadable entries are logged and left out.
pub fn find_images(image_dir: &Path, config: &ScanConfig) -> Vec<PathBuf> {
    WalkDir::new(image_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Cannot read entry in {}: {}", image_dir.display(), e);
                None
            }
        })
        .filter(|e| e.file_type().is_file() && config.is_image(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// Metadata file for an image: same stem, `.json`, in the party's metadata folder.
#[must_use]
pub fn metadata_path_for(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let party_dir = image_path
        .parent()
        .and_then(Path::parent)
        .unwrap_or(Path::new(""));
    party_dir.join(METADATA_DIR).join(format!("{stem}.json"))
}

/// Walk the dataset without progress reporting.
///
/// # Errors
/// See [`walk_with_progress`].
pub fn walk(config: &ScanConfig) -> Result<WalkOutcome> {
    walk_with_progress(config, &|_| {})
}

/// Walk the dataset and build one record per image.
///
/// Records come back in discovery order (party directory name, then image
/// file name) whether or not `config.parallel` is set.
///
/// Overlays go to `<overlay_dir>/<party>/`, so equal file names in two
/// parties never share an overlay path.
///
/// # Errors
/// Returns [`Error::DatabaseNotFound`] if `<root>/Database` is missing,
/// configuration errors from [`ScanConfig::validate`], and any image error
/// that is not confined to that image (see [`Error::is_per_file`]).
pub fn walk_with_progress(config: &ScanConfig, progress: ScanProgressCallback) -> Result<WalkOutcome> {
    config.validate()?;

    let database = config.database_dir();
    if !database.is_dir() {
        return Err(Error::DatabaseNotFound { path: database });
    }

    progress(&ScanProgress::with_file(
        ScanPhase::Discovering,
        0,
        1,
        database.display().to_string(),
    ));

    let selected = config.selected_parties();
    let party_dirs = find_party_dirs(&database, &selected)?;

    for party in &selected {
        if !party_dirs.iter().any(|(name, _)| name == party) {
            tracing::warn!("No directory for selected party '{}' in {}", party, database.display());
        }
    }

    let mut outcome = WalkOutcome::default();
    let mut tasks = Vec::new();

    for (party, party_dir) in &party_dirs {
        let palette = config.palettes.require(party)?;
        let image_dir = party_dir.join(IMAGE_DIR);
        if !image_dir.is_dir() {
            tracing::warn!("Skipping party '{}': no {}/ folder", party, IMAGE_DIR);
            continue;
        }

        let images = find_images(&image_dir, config);
        tracing::info!("Party '{}': {} images, {} palette colors", party, images.len(), palette.len());

        outcome.parties.push(party.clone());
        tasks.extend(images.into_iter().map(|path| ImageTask {
            party: party.as_str(),
            palette,
            path,
        }));
    }

    let total = tasks.len();
    let processed = AtomicUsize::new(0);
    let run_task = |task: &ImageTask| {
        let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
        progress(&ScanProgress::with_file(
            ScanPhase::Processing,
            current,
            total,
            file_name_of(&task.path),
        ));
        process_image(task, config)
    };

    // Indexed collect keeps task order in the parallel path
    let results: Vec<Result<Processed>> = if config.parallel {
        tasks.par_iter().map(run_task).collect()
    } else {
        tasks.iter().map(run_task).collect()
    };

    for (task, result) in tasks.iter().zip(results) {
        match result {
            Ok(done) => {
                match done.metadata {
                    MetadataStatus::Found => {}
                    MetadataStatus::Missing => outcome.metadata_missing += 1,
                    MetadataStatus::Malformed => outcome.metadata_errors += 1,
                }
                outcome.overlays_written += done.overlays_written;
                outcome.records.push(done.record);
            }
            Err(e) if !e.is_per_file() => return Err(e),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", task.path.display(), e);
                outcome.skipped.push(SkippedFile {
                    path: task.path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        "Walk complete: {} records, {} skipped",
        outcome.records.len(),
        outcome.skipped.len()
    );

    Ok(outcome)
}

/// Decode, read metadata, match, and render overlays for one image.
fn process_image(task: &ImageTask, config: &ScanConfig) -> Result<Processed> {
    let file_name = file_name_of(&task.path);
    let name = PostName::decode(&file_name)?;

    let metadata_path = metadata_path_for(&task.path);
    let (engagement, metadata) = match extract_metadata(&metadata_path) {
        Ok(Metadata::Found(engagement)) => (engagement, MetadataStatus::Found),
        Ok(Metadata::Missing) => {
            tracing::debug!("No metadata for {}", file_name);
            (Metadata::Missing.engagement(), MetadataStatus::Missing)
        }
        Err(e) => {
            tracing::warn!("Ignoring metadata for {}: {}", file_name, e);
            (Metadata::Missing.engagement(), MetadataStatus::Malformed)
        }
    };

    let image = load_rgb(&task.path)?;
    let matches = match_all(&image, task.palette, &config.tolerances)?;

    let mut overlays_written = 0;
    if config.write_overlays {
        let overlay_dir = config.overlay_path().join(task.party);
        for color_match in &matches {
            write_overlay(
                &image,
                &color_match.mask,
                config.highlight,
                &task.path,
                color_match.tolerance,
                &overlay_dir,
            )?;
            overlays_written += 1;
        }
    }

    let shares: Vec<ColorShare> = matches
        .iter()
        .map(|m| ColorShare {
            tolerance: m.tolerance,
            fraction: m.fraction,
        })
        .collect();

    tracing::debug!(
        "{} / {}: shares {:?}",
        task.party,
        file_name,
        shares.iter().map(|s| s.fraction).collect::<Vec<_>>()
    );

    Ok(Processed {
        record: PostRecord::new(task.party, file_name, name, engagement, shares),
        metadata,
        overlays_written,
    })
}

/// Open and decode an image as 8-bit RGB, sniffing the format from content.
pub(crate) fn load_rgb(path: &Path) -> Result<RgbImage> {
    let decode_error = |message: String| Error::ImageDecode {
        path: path.to_path_buf(),
        message,
    };

    let image = ImageReader::open(path)
        .map_err(|e| decode_error(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| decode_error(e.to_string()))?
        .decode()
        .map_err(|e| decode_error(e.to_string()))?;

    Ok(image.to_rgb8())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{PaletteRegistry, Rgb};
    use image::Rgb as Pixel;
    use std::fs;
    use tempfile::TempDir;

    const CSU_BLUE: [u8; 3] = [0, 125, 184];

    fn test_config(root: &Path) -> ScanConfig {
        let mut config = ScanConfig::new(root);
        config.parties = vec!["csu".to_string(), "spdde".to_string()];
        config.image_extensions = vec!["png".to_string()];
        config.palettes = [
            ("csu".to_string(), Palette::new(vec![Rgb::from(CSU_BLUE)])),
            ("spdde".to_string(), Palette::new(vec![Rgb::new(224, 0, 26)])),
            ("fdp".to_string(), Palette::new(vec![Rgb::new(254, 237, 1)])),
        ]
        .into_iter()
        .collect::<PaletteRegistry>();
        config
    }

    fn party_dirs(root: &Path, party: &str) -> (PathBuf, PathBuf) {
        let image_dir = root.join("Database").join(party).join("jpg");
        let json_dir = root.join("Database").join(party).join("json");
        fs::create_dir_all(&image_dir).unwrap();
        fs::create_dir_all(&json_dir).unwrap();
        (image_dir, json_dir)
    }

    /// 4x4 image whose top `rows` rows are `color`, the rest white.
    fn save_image(path: &Path, color: [u8; 3], rows: u32) {
        RgbImage::from_fn(4, 4, |_, y| if y < rows { Pixel(color) } else { Pixel([255, 255, 255]) })
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_unreadable_image_dir_yields_no_images() {
        let temp = TempDir::new().unwrap();
        let config = test_config(temp.path());
        assert!(find_images(&temp.path().join("missing").join("jpg"), &config).is_empty());
    }

    #[test]
    fn test_missing_database_is_fatal() {
        let temp = TempDir::new().unwrap();
        let err = walk(&test_config(temp.path())).unwrap_err();
        assert!(matches!(err, Error::DatabaseNotFound { ref path } if path.ends_with("Database")));
    }

    #[test]
    fn test_only_selected_parties_are_walked() {
        let temp = TempDir::new().unwrap();
        let (csu_images, _) = party_dirs(temp.path(), "csu");
        let (fdp_images, _) = party_dirs(temp.path(), "fdp");
        save_image(&csu_images.join("2021-05-01_14-30-00.png"), CSU_BLUE, 2);
        save_image(&fdp_images.join("2021-05-02_10-00-00.png"), [254, 237, 1], 4);

        let outcome = walk(&test_config(temp.path())).unwrap();
        assert_eq!(outcome.parties, vec!["csu".to_string()]);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].party, "csu");
        assert_eq!(outcome.records[0].share(40), Some(0.5));
    }

    #[test]
    fn test_non_images_ignored_and_bad_names_skipped() {
        let temp = TempDir::new().unwrap();
        let (images, _) = party_dirs(temp.path(), "csu");
        save_image(&images.join("2021-05-01_14-30-00.png"), CSU_BLUE, 1);
        save_image(&images.join("profile.png"), CSU_BLUE, 1);
        fs::write(images.join("notes.txt"), "not an image").unwrap();

        let outcome = walk(&test_config(temp.path())).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].path.ends_with("profile.png"));
        assert_eq!(outcome.images_seen(), 2);
    }

    #[test]
    fn test_undecodable_image_skipped() {
        let temp = TempDir::new().unwrap();
        let (images, _) = party_dirs(temp.path(), "csu");
        fs::write(images.join("2021-05-01_14-30-00.png"), b"garbage").unwrap();
        save_image(&images.join("2021-05-01_14-30-00_2.png"), CSU_BLUE, 4);

        let outcome = walk(&test_config(temp.path())).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].slide, 2);
        assert!(outcome.skipped[0].reason.contains("decode"));
    }

    #[test]
    fn test_metadata_is_reset_per_record() {
        let temp = TempDir::new().unwrap();
        let (images, json) = party_dirs(temp.path(), "csu");
        save_image(&images.join("2021-05-01_14-30-00.png"), CSU_BLUE, 1);
        save_image(&images.join("2021-05-02_14-30-00.png"), CSU_BLUE, 1);
        save_image(&images.join("2021-05-03_14-30-00.png"), CSU_BLUE, 1);
        fs::write(
            json.join("2021-05-01_14-30-00.json"),
            r#"{"node":{"edge_media_preview_like":{"count":42},"comments":3}}"#,
        )
        .unwrap();
        fs::write(json.join("2021-05-03_14-30-00.json"), "{ not json").unwrap();

        let outcome = walk(&test_config(temp.path())).unwrap();
        let engagement: Vec<_> = outcome.records.iter().map(|r| (r.likes, r.comments)).collect();
        assert_eq!(engagement, vec![(Some(42), Some(3)), (None, None), (None, None)]);
        assert_eq!(outcome.metadata_missing, 1);
        assert_eq!(outcome.metadata_errors, 1);
    }

    #[test]
    fn test_overlays_per_tolerance() {
        let temp = TempDir::new().unwrap();
        let (images, _) = party_dirs(temp.path(), "spdde");
        save_image(&images.join("2021-05-01_14-30-00.png"), [224, 0, 26], 3);

        let mut config = test_config(temp.path());
        config.tolerances = vec![40, 45, 50];
        let outcome = walk(&config).unwrap();

        assert_eq!(outcome.overlays_written, 3);
        for tolerance in [40, 45, 50] {
            let overlay = temp
                .path()
                .join("Overlay_Images")
                .join("spdde")
                .join(format!("2021-05-01_14-30-00_delta{tolerance}.png"));
            assert!(overlay.is_file(), "missing {}", overlay.display());
        }
        assert_eq!(outcome.records[0].shares.len(), 3);
        assert_eq!(outcome.records[0].share(45), Some(0.75));
    }

    #[test]
    fn test_same_file_name_in_two_parties_keeps_both_overlays() {
        let temp = TempDir::new().unwrap();
        let (csu, _) = party_dirs(temp.path(), "csu");
        let (spd, _) = party_dirs(temp.path(), "spdde");
        save_image(&csu.join("2021-05-01_14-30-00.png"), CSU_BLUE, 1);
        save_image(&spd.join("2021-05-01_14-30-00.png"), [224, 0, 26], 3);

        let mut config = test_config(temp.path());
        config.parallel = true;
        let outcome = walk(&config).unwrap();

        assert_eq!(outcome.overlays_written, 2);
        let overlays = temp.path().join("Overlay_Images");
        for party in ["csu", "spdde"] {
            let overlay = overlays.join(party).join("2021-05-01_14-30-00_delta40.png");
            assert!(overlay.is_file(), "missing {}", overlay.display());
        }

        // Each overlay carries its own party's match
        let spd_overlay = image::open(overlays.join("spdde").join("2021-05-01_14-30-00_delta40.png"))
            .unwrap()
            .to_rgb8();
        assert_eq!(spd_overlay.get_pixel(0, 2).0, config.highlight.to_array());
        assert_eq!(spd_overlay.get_pixel(0, 3).0, [255, 255, 255]);
    }

    #[test]
    fn test_unreadable_image_and_blocked_overlay_are_skipped() {
        let temp = TempDir::new().unwrap();
        let (csu, _) = party_dirs(temp.path(), "csu");
        let (spd, _) = party_dirs(temp.path(), "spdde");
        save_image(&csu.join("2021-05-01_14-30-00.png"), CSU_BLUE, 2);
        fs::write(spd.join("2021-05-01_09-00-00.png"), b"").unwrap();
        save_image(&spd.join("2021-05-02_09-00-00.png"), [224, 0, 26], 4);

        // A plain file where the csu overlay directory should go
        let overlays = temp.path().join("Overlay_Images");
        fs::create_dir_all(&overlays).unwrap();
        fs::write(overlays.join("csu"), "in the way").unwrap();

        let outcome = walk(&test_config(temp.path())).unwrap();

        let skipped: Vec<_> = outcome.skipped.iter().map(|s| s.path.clone()).collect();
        assert_eq!(
            skipped,
            vec![csu.join("2021-05-01_14-30-00.png"), spd.join("2021-05-01_09-00-00.png")]
        );
        assert!(outcome.skipped[0].reason.contains("overlay"));
        assert!(outcome.skipped[1].reason.contains("decode"));

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].file_name, "2021-05-02_09-00-00.png");
        assert_eq!(outcome.records[0].share(40), Some(1.0));
        assert_eq!(outcome.overlays_written, 1);
    }

    #[test]
    fn test_overlays_can_be_disabled() {
        let temp = TempDir::new().unwrap();
        let (images, _) = party_dirs(temp.path(), "csu");
        save_image(&images.join("2021-05-01_14-30-00.png"), CSU_BLUE, 1);

        let mut config = test_config(temp.path());
        config.write_overlays = false;
        let outcome = walk(&config).unwrap();
        assert_eq!(outcome.overlays_written, 0);
        assert!(!temp.path().join("Overlay_Images").exists());
    }

    #[test]
    fn test_party_without_image_folder() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Database").join("csu")).unwrap();
        let outcome = walk(&test_config(temp.path())).unwrap();
        assert!(outcome.parties.is_empty());
        assert!(outcome.records.is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential_order() {
        let temp = TempDir::new().unwrap();
        let (csu, _) = party_dirs(temp.path(), "csu");
        let (spd, _) = party_dirs(temp.path(), "spdde");
        for day in 1..=9 {
            save_image(&csu.join(format!("2021-05-0{day}_12-00-00.png")), CSU_BLUE, day % 5);
            save_image(&spd.join(format!("2021-06-0{day}_12-00-00_{day}.png")), [224, 0, 26], 4);
        }

        let mut config = test_config(temp.path());
        config.write_overlays = false;
        let sequential = walk(&config).unwrap();
        config.parallel = true;
        let parallel = walk(&config).unwrap();

        assert_eq!(sequential.records.len(), 18);
        assert_eq!(sequential.records, parallel.records);
        assert_eq!(sequential.records[0].party, "csu");
        assert_eq!(sequential.records[17].party, "spdde");
    }

    #[test]
    fn test_metadata_path_mirrors_image() {
        assert_eq!(
            metadata_path_for(Path::new("/p/Database/csu/jpg/2021-05-01_14-30-00_2.jpg")),
            PathBuf::from("/p/Database/csu/json/2021-05-01_14-30-00_2.json")
        );
    }
}
