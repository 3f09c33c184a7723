//! Media ingestion: embedded image payloads to on-disk assets.
//!
//! # Storage Layout
//!
//! ```text
//! <home>/
//! ├── creative_images/   # creative_<hex12>.<ext>, referenced as /files/creative/...
//! ├── input/             # /files/input/...
//! └── output/            # /files/output/...
//! ```

pub mod extractor;
pub mod files;
pub mod format;

use thiserror::Error;

pub use extractor::{Ingest, MediaExtractor, SavedImage};
pub use files::{validate_filename, FileEntry};
pub use format::{EmbeddedPayload, ImageFormat};

/// Errors that can occur while materializing or managing asset files
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Malformed image payload: {0}")]
    MalformedPayload(String),

    #[error("Missing image data")]
    MissingData,

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Whether this failure is the caller's fault
    pub fn is_client_error(&self) -> bool {
        !matches!(self, MediaError::Io(_))
    }
}
