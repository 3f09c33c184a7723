//! Direct file operations on a scope directory: save, list, delete.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs;

use super::extractor::{MediaExtractor, SavedImage};
use super::format::EmbeddedPayload;
use super::MediaError;
use crate::config::paths::IMAGE_EXTENSIONS;

/// An image file found in a scope directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Accept only a bare file name that stays inside the scope directory
pub fn validate_filename(name: &str) -> Result<&str, MediaError> {
    let trimmed = name.trim();
    let bad = trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains('/')
        || trimmed.contains('\\')
        || trimmed.contains('\0');
    if bad {
        return Err(MediaError::InvalidFilename(name.to_string()));
    }
    Ok(trimmed)
}

fn is_image(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

impl MediaExtractor {
    /// Save an image the caller sends directly.
    ///
    /// `image_data` may be a data URL or bare base64. Without `filename` a
    /// name is generated from the sniffed format. Unlike record ingestion,
    /// decode failures are returned to the caller.
    pub async fn save_image(
        &self,
        image_data: Option<&str>,
        filename: Option<&str>,
    ) -> Result<SavedImage, MediaError> {
        let image_data = image_data
            .filter(|d| !d.trim().is_empty())
            .ok_or(MediaError::MissingData)?;
        let filename = filename.filter(|f| !f.trim().is_empty()).map(validate_filename).transpose()?;

        let payload = EmbeddedPayload::parse_lenient(image_data)?;
        let bytes = payload.decode()?;

        let filename = match filename {
            Some(name) => name.to_string(),
            None => self.generate_filename(payload.format()),
        };

        self.write(&filename, &bytes).await
    }

    /// Image files in the scope directory, most recently modified first
    pub async fn list_images(&self) -> Result<Vec<FileEntry>, MediaError> {
        list_images_in(self.dir()).await
    }

    /// Remove `filename` from the scope directory
    pub async fn delete_file(&self, filename: &str) -> Result<(), MediaError> {
        let filename = validate_filename(filename)?;
        let path = self.dir().join(filename);

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(MediaError::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

async fn list_images_in(dir: &Path) -> Result<Vec<FileEntry>, MediaError> {
    let mut files = Vec::new();

    if !dir.exists() {
        return Ok(files);
    }

    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !is_image(&name) {
            continue;
        }

        let modified: DateTime<Utc> = metadata.modified()?.into();
        let created: DateTime<Utc> = metadata
            .created()
            .map(Into::into)
            .unwrap_or(modified);

        files.push(FileEntry {
            name,
            size: metadata.len(),
            created,
            modified,
        });
    }

    files.sort_by(|a, b| b.modified.cmp(&a.modified));
    Ok(files)
}
