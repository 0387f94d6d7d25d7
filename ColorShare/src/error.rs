//! Error types for `ColorShare`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `ColorShare` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Configuration Errors ====================
    /// The `Database` directory does not exist under the project root.
    #[error("database directory not found: {path}")]
    DatabaseNotFound {
        /// The expected database path.
        path: PathBuf,
    },

    /// A selected party has no palette in the registry.
    #[error("no palette configured for party '{party}'")]
    MissingPalette {
        /// The party identifier.
        party: String,
    },

    /// The configuration is structurally valid but semantically unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be parsed.
    #[error("failed to parse config {path}: {message}")]
    ConfigParse {
        /// The config file path.
        path: PathBuf,
        /// The parser error message.
        message: String,
    },

    // ==================== Per-File Errors ====================
    /// The image filename does not encode a date and time.
    #[error("cannot decode file name '{file_name}': {reason}")]
    InvalidFileName {
        /// The offending file name.
        file_name: String,
        /// Why decoding failed.
        reason: String,
    },

    /// A metadata file exists but is not usable JSON.
    #[error("malformed metadata {path}: {message}")]
    MetadataParse {
        /// The metadata file path.
        path: PathBuf,
        /// The JSON parser error message.
        message: String,
    },

    /// The image could not be opened or decoded.
    #[error("failed to decode image {path}: {message}")]
    ImageDecode {
        /// The image path.
        path: PathBuf,
        /// The decoder error message.
        message: String,
    },

    /// The image has zero pixels, so no fraction can be computed.
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// The overlay directory could not be created.
    #[error("cannot create overlay directory {path}: {source}")]
    OverlayDirectory {
        /// The overlay directory.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The overlay image could not be encoded or written.
    #[error("failed to write overlay {path}: {message}")]
    OverlayWrite {
        /// The overlay file path.
        path: PathBuf,
        /// The encoder error message.
        message: String,
    },

    /// A match mask does not have the dimensions of the image it is applied to.
    #[error("mask is {mask_width}x{mask_height} but image is {image_width}x{image_height}")]
    MaskSizeMismatch {
        /// Mask width.
        mask_width: u32,
        /// Mask height.
        mask_height: u32,
        /// Image width.
        image_width: u32,
        /// Image height.
        image_height: u32,
    },

    // ==================== Traversal Errors ====================
    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDir(String),
}

impl Error {
    /// Whether the error concerns a single image and can be isolated from the run.
    #[must_use]
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Error::InvalidFileName { .. }
                | Error::MetadataParse { .. }
                | Error::ImageDecode { .. }
                | Error::EmptyImage { .. }
                | Error::OverlayDirectory { .. }
                | Error::OverlayWrite { .. }
                | Error::MaskSizeMismatch { .. }
        )
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDir(err.to_string())
    }
}

/// A specialized Result type for `ColorShare` operations.
pub type Result<T> = std::result::Result<T, Error>;
