//! The idea library: creative prompts with optional images.

use serde::Serialize;
use tracing::info;

use crate::core::{
    next_id, reorder, CollectionStore, DedupIndex, DedupKey, IdAllocator, StoreError,
};
use crate::domain::Record;
use crate::media::{Ingest, MediaExtractor};

/// Collection name used in errors and logs
pub const COLLECTION: &str = "Idea";

/// A stored record plus any soft warning raised while storing it
#[derive(Debug, Clone, Serialize)]
pub struct Stored {
    pub record: Record,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Result of a bulk import
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    /// Newly stored ideas, in input order
    pub accepted: Vec<Record>,
    pub accepted_count: usize,
    pub skipped_count: usize,

    /// Images that could not be extracted (the ideas were still accepted)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ImportOutcome {
    pub fn summary(&self) -> String {
        let mut message = format!("Imported {} new ideas", self.accepted_count);
        if self.skipped_count > 0 {
            message.push_str(&format!(", skipped {} duplicates", self.skipped_count));
        }
        message
    }
}

/// Result of sweeping embedded images out of the stored library
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub migrated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Idea library backed by a JSON collection file
#[derive(Debug, Clone)]
pub struct IdeaLibrary {
    store: CollectionStore<Record>,
    extractor: MediaExtractor,
}

impl IdeaLibrary {
    pub fn new(store: CollectionStore<Record>, extractor: MediaExtractor) -> Self {
        Self { store, extractor }
    }

    pub fn store(&self) -> &CollectionStore<Record> {
        &self.store
    }

    pub fn extractor(&self) -> &MediaExtractor {
        &self.extractor
    }

    /// All ideas in stored order
    pub async fn list(&self) -> Vec<Record> {
        self.store.load().await
    }

    /// Get an idea by ID
    pub async fn get(&self, id: i64) -> Result<Record, StoreError> {
        self.store
            .load()
            .await
            .into_iter()
            .find(|idea| idea.id() == Some(id))
            .ok_or_else(|| StoreError::not_found(COLLECTION, id))
    }

    /// Store a new idea.
    ///
    /// Duplicate titles/prompts are allowed here; only bulk import filters
    /// them.
    pub async fn create(&self, mut idea: Record) -> Result<Stored, StoreError> {
        let ingest = self.extractor.ingest(&mut idea).await;

        match self.append(idea).await {
            Ok(record) => Ok(Stored {
                record,
                warning: ingest.warning().map(str::to_string),
            }),
            Err(e) => {
                self.extractor.discard(&ingest).await;
                Err(e)
            }
        }
    }

    async fn append(&self, mut idea: Record) -> Result<Record, StoreError> {
        let mut ideas = self.store.lock().await?;
        idea.set_id(next_id(ideas.iter())?);
        idea.stamp_created();
        ideas.push(idea.clone());
        ideas.commit().await?;

        info!(id = ?idea.id(), "Idea created");
        Ok(idea)
    }

    /// Merge `patch` into the idea with `id`
    pub async fn update(&self, id: i64, mut patch: Record) -> Result<Stored, StoreError> {
        let mut ideas = self.store.lock().await?;
        let pos = ideas
            .iter()
            .position(|idea| idea.id() == Some(id))
            .ok_or_else(|| StoreError::not_found(COLLECTION, id))?;

        let ingest = self.extractor.ingest(&mut patch).await;
        ideas[pos].merge(patch);
        let updated = ideas[pos].clone();
        if let Err(e) = ideas.commit().await {
            self.extractor.discard(&ingest).await;
            return Err(e);
        }

        Ok(Stored {
            record: updated,
            warning: ingest.warning().map(str::to_string),
        })
    }

    /// Remove the idea with `id`
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut ideas = self.store.lock().await?;
        let before = ideas.len();
        ideas.retain(|idea| idea.id() != Some(id));

        if ideas.len() == before {
            return Err(StoreError::not_found(COLLECTION, id));
        }
        ideas.commit().await?;
        Ok(())
    }

    /// Bulk import, skipping ideas whose (title, prompt) already exists.
    ///
    /// Duplicates are checked against the stored library and against ideas
    /// accepted earlier in the same batch; the first occurrence wins.
    pub async fn import(&self, incoming: Vec<Record>) -> Result<ImportOutcome, StoreError> {
        let mut ideas = self.store.lock().await?;
        let mut written = Vec::new();

        let outcome = match self.merge_batch(&mut ideas, incoming, &mut written).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.discard_all(&written).await;
                return Err(e);
            }
        };
        if let Err(e) = ideas.commit().await {
            self.discard_all(&written).await;
            return Err(e);
        }

        info!(
            accepted = outcome.accepted_count,
            skipped = outcome.skipped_count,
            "Import finished"
        );
        Ok(outcome)
    }

    /// Append the non-duplicate ideas of `incoming` to `ideas`, recording
    /// every extracted image in `written`
    async fn merge_batch(
        &self,
        ideas: &mut Vec<Record>,
        incoming: Vec<Record>,
        written: &mut Vec<Ingest>,
    ) -> Result<ImportOutcome, StoreError> {
        let mut seen = DedupIndex::from_records(ideas.iter());
        let mut ids = IdAllocator::after(ideas.iter());
        let mut outcome = ImportOutcome::default();

        for mut idea in incoming {
            let key = DedupKey::of(&idea);
            if seen.contains(&key) {
                outcome.skipped_count += 1;
                continue;
            }

            idea.set_id(ids.allocate()?);
            idea.stamp_created();

            match self.extractor.ingest(&mut idea).await {
                Ingest::Failed(reason) => outcome
                    .warnings
                    .push(format!("idea {}: {}", idea.id().unwrap_or_default(), reason)),
                extracted @ Ingest::Extracted(_) => written.push(extracted),
                Ingest::Untouched => {}
            }

            ideas.push(idea.clone());
            outcome.accepted.push(idea);
            seen.insert(key);
        }

        outcome.accepted_count = outcome.accepted.len();
        Ok(outcome)
    }

    async fn discard_all(&self, written: &[Ingest]) {
        for ingest in written {
            self.extractor.discard(ingest).await;
        }
    }

    /// Apply an explicit ordering; unlisted ideas keep their relative order
    pub async fn reorder(&self, ordered_ids: &[i64]) -> Result<(), StoreError> {
        let mut ideas = self.store.lock().await?;
        let current = std::mem::take(&mut *ideas);
        ideas.replace(reorder(current, ordered_ids));
        ideas.commit().await?;
        Ok(())
    }

    /// Extract every embedded image still stored inline in the library
    pub async fn migrate_images(&self) -> Result<MigrationReport, StoreError> {
        let mut ideas = self.store.lock().await?;
        let mut report = MigrationReport::default();
        let mut written = Vec::new();

        for idea in ideas.iter_mut() {
            match self.extractor.ingest(idea).await {
                extracted @ Ingest::Extracted(_) => {
                    report.migrated += 1;
                    written.push(extracted);
                }
                Ingest::Untouched => report.skipped += 1,
                Ingest::Failed(_) => report.failed += 1,
            }
        }

        if report.migrated > 0 {
            if let Err(e) = ideas.commit().await {
                self.discard_all(&written).await;
                return Err(e);
            }
        }

        info!(
            migrated = report.migrated,
            skipped = report.skipped,
            failed = report.failed,
            "Image migration finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{fields, AssetScope};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_library() -> (IdeaLibrary, TempDir) {
        let temp = TempDir::new().unwrap();
        let library = IdeaLibrary::new(
            CollectionStore::new(COLLECTION, temp.path().join("data/creative_ideas.json")),
            MediaExtractor::new(AssetScope::Creative, temp.path().join("creative_images")),
        );
        (library, temp)
    }

    fn idea(title: &str, prompt: &str) -> Record {
        Record::from_value(json!({"title": title, "prompt": prompt})).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let (library, _temp) = create_test_library();

        let a = library.create(idea("A", "a")).await.unwrap().record;
        let b = library.create(idea("A", "a")).await.unwrap().record;

        assert_eq!(a.id(), Some(1));
        assert_eq!(b.id(), Some(2));
        assert!(a.contains_key(fields::CREATED_AT));
        assert_eq!(library.list().await.len(), 2);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (library, _temp) = create_test_library();
        let err = library.get(42).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 42, .. }));
    }

    #[tokio::test]
    async fn test_update_missing_does_not_write() {
        let (library, _temp) = create_test_library();
        let err = library.update(1, idea("x", "y")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(!library.store().path().exists());
    }

    #[tokio::test]
    async fn test_delete() {
        let (library, _temp) = create_test_library();
        library.create(idea("A", "a")).await.unwrap();

        library.delete(1).await.unwrap();
        assert!(library.list().await.is_empty());
        assert!(library.delete(1).await.is_err());
    }

    #[tokio::test]
    async fn test_import_skips_case_insensitive_duplicates_in_batch() {
        let (library, _temp) = create_test_library();

        let outcome = library
            .import(vec![idea("Cat", "cute cat"), idea("cat", "Cute Cat")])
            .await
            .unwrap();

        assert_eq!(outcome.accepted_count, 1);
        assert_eq!(outcome.skipped_count, 1);
        assert_eq!(outcome.accepted[0].title(), "Cat");
    }

    #[tokio::test]
    async fn test_migrate_images() {
        let (library, _temp) = create_test_library();
        library.store().save(&[
            Record::from_value(json!({"id": 1, "imageUrl": "data:image/gif;base64,R0lGOA=="})).unwrap(),
            Record::from_value(json!({"id": 2, "imageUrl": "/files/creative/done.png"})).unwrap(),
            Record::from_value(json!({"id": 3, "imageUrl": "data:image/png;base64,!!"})).unwrap(),
            Record::from_value(json!({"id": 4})).unwrap(),
        ])
        .await
        .unwrap();

        let report = library.migrate_images().await.unwrap();
        assert_eq!(report, MigrationReport { migrated: 1, skipped: 2, failed: 1 });

        let stored = library.get(1).await.unwrap();
        let url = stored.image_url().unwrap();
        assert!(url.starts_with("/files/creative/creative_") && url.ends_with(".gif"));
        assert_eq!(
            library.get(3).await.unwrap().image_url(),
            Some("data:image/png;base64,!!")
        );
    }
}
