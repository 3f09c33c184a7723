//! Errors surfaced by store operations.

use thiserror::Error;

use crate::media::MediaError;

/// Errors that can occur while operating on a collection
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection} entry not found: {id}")]
    NotFound { collection: &'static str, id: i64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Id space exhausted: largest stored id is {0}")]
    IdsExhausted(i64),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(collection: &'static str, id: i64) -> Self {
        Self::NotFound { collection, id }
    }

    /// Whether this failure is the caller's fault (as opposed to the disk's)
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::InvalidInput(_) => true,
            Self::Media(err) => err.is_client_error(),
            Self::IdsExhausted(_) | Self::Io(_) | Self::Serialization(_) => false,
        }
    }
}
