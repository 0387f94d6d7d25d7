//! Filename decoding: `{date}_{time}[_{slide}].{ext}`

use std::path::Path;

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Date format of the first filename token.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Temporal and slideshow fields recovered from an image filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostName {
    pub date: NaiveDate,
    /// Clock time exactly as encoded in the filename (e.g. `14-30-00`).
    pub time: String,
    pub is_slideshow: bool,
    /// 1-based position within the slideshow; always 1 for single-image posts.
    pub slide: u32,
}

impl PostName {
    /// Decode a file name (or path; only the final component is used).
    ///
    /// The first two `_`-separated stem tokens are date and time. A stem ending
    /// in `_<digits>` marks a slideshow and the digits give the slide index.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFileName`] if date or time is missing, the date
    /// is not a calendar date, or the slide index is zero or out of range.
    pub fn decode(file_name: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidFileName {
            file_name: file_name.to_string(),
            reason,
        };

        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| invalid("no file stem".to_string()))?;

        let tokens: Vec<&str> = stem.split('_').collect();
        if tokens.len() < 2 || tokens[0].is_empty() || tokens[1].is_empty() {
            return Err(invalid("expected '{date}_{time}' at the start of the name".to_string()));
        }

        let date = NaiveDate::parse_from_str(tokens[0], DATE_FORMAT)
            .map_err(|e| invalid(format!("date '{}' is not YYYY-MM-DD: {e}", tokens[0])))?;
        let time = tokens[1].to_string();

        let slide_token = tokens
            .last()
            .filter(|t| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()));

        let (is_slideshow, slide) = match slide_token {
            Some(token) => {
                let slide: u32 = token
                    .parse()
                    .map_err(|_| invalid(format!("slide index '{token}' out of range")))?;
                if slide == 0 {
                    return Err(invalid("slide index must be 1 or greater".to_string()));
                }
                (true, slide)
            }
            None => (false, 1),
        };

        Ok(Self {
            date,
            time,
            is_slideshow,
            slide,
        })
    }

    /// The date rendered as `YYYY-MM-DD`.
    #[must_use]
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}
