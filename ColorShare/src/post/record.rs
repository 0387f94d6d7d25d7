//! One output row per image

use chrono::NaiveDate;

use super::filename::PostName;
use super::metadata::Engagement;

/// Matched share at one tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorShare {
    pub tolerance: u8,
    /// Four-decimal fraction in `[0, 1]`.
    pub fraction: f64,
}

/// Post metadata joined with the color shares of its image.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub party: String,
    pub date: NaiveDate,
    pub time: String,
    pub is_slideshow: bool,
    pub slide: u32,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
    pub file_name: String,
    /// One entry per configured tolerance, in configuration order.
    pub shares: Vec<ColorShare>,
}

impl PostRecord {
    #[must_use]
    pub fn new(
        party: impl Into<String>,
        file_name: impl Into<String>,
        name: PostName,
        engagement: Engagement,
        shares: Vec<ColorShare>,
    ) -> Self {
        Self {
            party: party.into(),
            date: name.date,
            time: name.time,
            is_slideshow: name.is_slideshow,
            slide: name.slide,
            likes: engagement.likes,
            comments: engagement.comments,
            file_name: file_name.into(),
            shares,
        }
    }

    /// Share at `tolerance`, if it was computed.
    #[must_use]
    pub fn share(&self, tolerance: u8) -> Option<f64> {
        self.shares
            .iter()
            .find(|s| s.tolerance == tolerance)
            .map(|s| s.fraction)
    }
}
