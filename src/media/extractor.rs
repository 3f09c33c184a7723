//! Materializing embedded image payloads as files.
//!
//! An extractor owns one asset scope and its directory. Extraction decodes
//! the whole payload before touching the disk, so a malformed payload never
//! leaves a partial file behind.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use super::format::{EmbeddedPayload, ImageFormat};
use super::MediaError;
use crate::domain::{AssetRef, AssetScope, Record};

/// Length of the random hex suffix in generated filenames
const SUFFIX_LEN: usize = 12;

/// Writes decoded images into a scope directory
#[derive(Debug, Clone)]
pub struct MediaExtractor {
    scope: AssetScope,
    dir: PathBuf,
}

/// A file written by the extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedImage {
    pub filename: String,
    pub path: PathBuf,
    pub url: AssetRef,

    #[serde(skip)]
    pub size: usize,
}

/// What happened to a record's `imageUrl` during ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ingest {
    /// No embedded payload (absent, a reference, or some other URL)
    Untouched,

    /// Payload written to disk; the record now holds the reference
    Extracted(AssetRef),

    /// Payload could not be materialized; the record keeps it as-is
    Failed(String),
}

impl Ingest {
    /// Soft warning to report back to the caller
    pub fn warning(&self) -> Option<&str> {
        match self {
            Ingest::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl MediaExtractor {
    pub fn new(scope: AssetScope, dir: impl Into<PathBuf>) -> Self {
        Self {
            scope,
            dir: dir.into(),
        }
    }

    pub fn scope(&self) -> AssetScope {
        self.scope
    }

    /// Get the directory extracted files are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<prefix>_<12 hex chars><ext>`
    pub fn generate_filename(&self, format: ImageFormat) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!(
            "{}_{}{}",
            self.scope.file_prefix(),
            &suffix[..SUFFIX_LEN],
            format.extension()
        )
    }

    /// Decode `payload` and write it under a generated name
    pub async fn extract(&self, payload: &EmbeddedPayload<'_>) -> Result<SavedImage, MediaError> {
        let bytes = payload.decode()?;
        let filename = self.generate_filename(payload.format());
        self.write(&filename, &bytes).await
    }

    /// Write already-decoded bytes as `filename` inside the scope directory
    pub(crate) async fn write(&self, filename: &str, bytes: &[u8]) -> Result<SavedImage, MediaError> {
        fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(filename);
        if let Err(e) = fs::write(&path, bytes).await {
            let _ = fs::remove_file(&path).await;
            return Err(e.into());
        }

        Ok(SavedImage {
            filename: filename.to_string(),
            url: AssetRef::new(self.scope, filename),
            path,
            size: bytes.len(),
        })
    }

    /// Remove the file an earlier [`ingest`](Self::ingest) wrote, for records
    /// that were never stored
    pub async fn discard(&self, ingest: &Ingest) {
        let Ingest::Extracted(reference) = ingest else {
            return;
        };
        let Some((_, filename)) = AssetRef::parse(reference.as_str()) else {
            return;
        };

        let path = self.dir.join(filename);
        match fs::remove_file(&path).await {
            Ok(()) => info!(file = %filename, "Removed unreferenced image"),
            Err(e) => warn!(file = %path.display(), error = %e, "Failed to remove unreferenced image"),
        }
    }

    /// Replace an embedded `imageUrl` on `record` with a file reference.
    ///
    /// Never fails: a payload that cannot be decoded or written stays on the
    /// record untouched and the reason comes back as [`Ingest::Failed`].
    pub async fn ingest(&self, record: &mut Record) -> Ingest {
        let Some(image_url) = record.image_url() else {
            return Ingest::Untouched;
        };
        if !EmbeddedPayload::is_embedded(image_url) {
            return Ingest::Untouched;
        }

        let result = match EmbeddedPayload::parse(image_url) {
            Ok(payload) => self.extract(&payload).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(saved) => {
                info!(
                    file = %saved.filename,
                    kb = saved.size / 1024,
                    "Image saved"
                );
                record.set_image_url(saved.url.as_str());
                Ingest::Extracted(saved.url)
            }
            Err(e) => {
                warn!(id = ?record.id(), error = %e, "Image extraction failed, keeping payload");
                Ingest::Failed(e.to_string())
            }
        }
    }
}
