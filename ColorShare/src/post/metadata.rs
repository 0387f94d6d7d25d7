//! Engagement counts from a post's companion JSON file
//!
//! Expected shape (every level optional):
//!
//! ```json
//! { "node": { "edge_media_preview_like": { "count": 42 }, "comments": 7 } }
//! ```

use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

/// Likes and comments of one post; `None` when the source lacks the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Engagement {
    pub likes: Option<u64>,
    pub comments: Option<u64>,
}

/// Outcome of a metadata lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metadata {
    /// The metadata file exists and parsed.
    Found(Engagement),
    /// There is no metadata file for this image.
    Missing,
}

impl Metadata {
    /// Engagement counts, empty when the file was missing.
    #[must_use]
    pub fn engagement(self) -> Engagement {
        match self {
            Metadata::Found(engagement) => engagement,
            Metadata::Missing => Engagement::default(),
        }
    }
}

/// Read engagement counts from `path`.
///
/// A missing file is not an error.
///
/// # Errors
/// Returns [`Error::MetadataParse`] if the file exists but is not valid JSON,
/// or an IO error if it cannot be read.
pub fn extract(path: &Path) -> Result<Metadata> {
    if !path.is_file() {
        return Ok(Metadata::Missing);
    }

    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content).map_err(|e| Error::MetadataParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(Metadata::Found(engagement_from_value(&value)))
}

/// Pull likes and comments out of an already parsed document.
#[must_use]
pub fn engagement_from_value(value: &Value) -> Engagement {
    let Some(node) = value.get("node") else {
        return Engagement::default();
    };

    let likes = node
        .pointer("/edge_media_preview_like/count")
        .and_then(Value::as_u64);

    // `comments` is usually a bare count; older exports nest it under `count`
    let comments = match node.get("comments") {
        Some(Value::Object(inner)) => inner.get("count").and_then(Value::as_u64),
        Some(other) => other.as_u64(),
        None => node
            .pointer("/edge_media_to_comment/count")
            .and_then(Value::as_u64),
    };

    Engagement { likes, comments }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_likes_without_comments() {
        let value = json!({"node": {"edge_media_preview_like": {"count": 42}}});
        let engagement = engagement_from_value(&value);
        assert_eq!(engagement.likes, Some(42));
        assert_eq!(engagement.comments, None);
    }

    #[test]
    fn test_full_document() {
        let value = json!({
            "node": {
                "edge_media_preview_like": {"count": 1200},
                "comments": 87,
                "shortcode": "CNx"
            }
        });
        assert_eq!(
            engagement_from_value(&value),
            Engagement {
                likes: Some(1200),
                comments: Some(87)
            }
        );
    }

    #[test]
    fn test_comment_fallbacks() {
        let nested = json!({"node": {"comments": {"count": 5}}});
        assert_eq!(engagement_from_value(&nested).comments, Some(5));

        let edge = json!({"node": {"edge_media_to_comment": {"count": 9}}});
        assert_eq!(engagement_from_value(&edge).comments, Some(9));
    }

    #[test]
    fn test_no_node() {
        let value = json!({"edge_media_preview_like": {"count": 3}});
        assert_eq!(engagement_from_value(&value), Engagement::default());
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = extract(&temp.path().join("absent.json")).unwrap();
        assert_eq!(result, Metadata::Missing);
        assert_eq!(result.engagement(), Engagement::default());
    }

    #[test]
    fn test_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("2021-05-01_14-30-00.json");
        fs::write(&path, r#"{"node":{"edge_media_preview_like":{"count":42}}}"#).unwrap();
        let result = extract(&path).unwrap();
        assert_eq!(
            result,
            Metadata::Found(Engagement {
                likes: Some(42),
                comments: None
            })
        );
    }

    #[test]
    fn test_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{\"node\": ").unwrap();
        let err = extract(&path).unwrap_err();
        assert!(matches!(err, Error::MetadataParse { .. }));
    }
}
