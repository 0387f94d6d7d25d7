//! Output table writer
//!
//! Writes one CSV row per [`PostRecord`] under a fixed header:
//!
//! ```text
//! Partei,Datum,Uhrzeit,Slideshow,Slide,Likes,Kommentare,Dateiname,RGB Anteil Delta 40
//! csu,2021-05-01,14-30-00,0,1,42,,2021-05-01_14-30-00.jpg,0.1234
//! ```
//!
//! Absent likes/comments are written as empty fields. The file is replaced on
//! every run.

use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::post::PostRecord;

/// The fixed columns preceding the per-tolerance share columns.
pub const FIXED_COLUMNS: [&str; 8] = [
    "Partei",
    "Datum",
    "Uhrzeit",
    "Slideshow",
    "Slide",
    "Likes",
    "Kommentare",
    "Dateiname",
];

const DELIMITER: char = ',';

/// Header label of the share column for `tolerance`.
#[must_use]
pub fn share_column(tolerance: u8) -> String {
    format!("RGB Anteil Delta {tolerance}")
}

/// The full header row for the given tolerance list.
#[must_use]
pub fn header(tolerances: &[u8]) -> Vec<String> {
    FIXED_COLUMNS
        .iter()
        .map(|c| (*c).to_string())
        .chain(tolerances.iter().map(|&t| share_column(t)))
        .collect()
}

/// Render one record as table fields, in header order.
///
/// Share fields follow `tolerances`; a tolerance the record lacks leaves an empty field.
#[must_use]
pub fn row(record: &PostRecord, tolerances: &[u8]) -> Vec<String> {
    let optional = |value: Option<u64>| value.map(|v| v.to_string()).unwrap_or_default();

    let mut fields = vec![
        record.party.clone(),
        record.date.format(crate::post::filename::DATE_FORMAT).to_string(),
        record.time.clone(),
        u8::from(record.is_slideshow).to_string(),
        record.slide.to_string(),
        optional(record.likes),
        optional(record.comments),
        record.file_name.clone(),
    ];
    fields.extend(tolerances.iter().map(|&t| {
        record
            .share(t)
            .map(|fraction| format!("{fraction:.4}"))
            .unwrap_or_default()
    }));
    fields
}

/// Write all records to `writer`.
pub fn write_to<W: Write>(writer: &mut W, records: &[PostRecord], tolerances: &[u8]) -> Result<()> {
    write_line(writer, &header(tolerances))?;
    for record in records {
        write_line(writer, &row(record, tolerances))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write all records to `path`, replacing any existing file.
///
/// # Returns
/// The number of data rows written.
pub fn write_table<P: AsRef<Path>>(path: P, records: &[PostRecord], tolerances: &[u8]) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_to(&mut writer, records, tolerances)?;

    tracing::info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(records.len())
}

fn write_line<W: Write>(writer: &mut W, fields: &[String]) -> Result<()> {
    let line = fields
        .iter()
        .map(|f| escape_for_delimited(f, DELIMITER))
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string());
    writeln!(writer, "{line}")?;
    Ok(())
}

/// Escape text for CSV output
fn escape_for_delimited(text: &str, delimiter: char) -> String {
    // If text contains delimiter, newlines, or quotes, wrap in quotes and escape quotes
    if text.contains(delimiter) || text.contains('\n') || text.contains('\r') || text.contains('"')
    {
        let escaped = text.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::{ColorShare, Engagement, PostName};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn record(file_name: &str, likes: Option<u64>, comments: Option<u64>, fraction: f64) -> PostRecord {
        PostRecord::new(
            "csu",
            file_name,
            PostName::decode(file_name).unwrap(),
            Engagement { likes, comments },
            vec![ColorShare {
                tolerance: 40,
                fraction,
            }],
        )
    }

    #[test]
    fn test_header() {
        assert_eq!(
            header(&[40, 50]).join(","),
            "Partei,Datum,Uhrzeit,Slideshow,Slide,Likes,Kommentare,Dateiname,RGB Anteil Delta 40,RGB Anteil Delta 50"
        );
    }

    #[test]
    fn test_rows() {
        let mut buffer = Vec::new();
        let records = vec![
            record("2021-05-01_14-30-00.jpg", Some(42), None, 0.05),
            record("2021-05-01_14-30-00_3.jpg", None, Some(7), 1.0),
        ];
        write_to(&mut buffer, &records, &[40, 45]).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "csu,2021-05-01,14-30-00,0,1,42,,2021-05-01_14-30-00.jpg,0.0500,");
        assert_eq!(lines[2], "csu,2021-05-01,14-30-00,1,3,,7,2021-05-01_14-30-00_3.jpg,1.0000,");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_for_delimited("die,linke", ','), "\"die,linke\"");
        assert_eq!(escape_for_delimited("say \"hi\"", ','), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_for_delimited("csu", ','), "csu");
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out").join("output.csv");

        let first = vec![
            record("2021-05-01_14-30-00.jpg", None, None, 0.1),
            record("2021-05-02_14-30-00.jpg", None, None, 0.2),
        ];
        assert_eq!(write_table(&path, &first, &[40]).unwrap(), 2);

        let second = vec![record("2021-05-03_14-30-00.jpg", None, None, 0.3)];
        assert_eq!(write_table(&path, &second, &[40]).unwrap(), 1);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("2021-05-03"));
        assert!(!text.contains("2021-05-01"));
    }
}
