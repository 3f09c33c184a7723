//! Generation history: newest first, bounded.

use tracing::info;

use crate::core::{ring, CollectionStore, StoreError};
use crate::domain::Record;

/// Collection name used in errors and logs
pub const COLLECTION: &str = "History";

/// History log backed by a JSON collection file
#[derive(Debug, Clone)]
pub struct History {
    store: CollectionStore<Record>,
    capacity: usize,
}

impl History {
    /// A capacity of 0 is raised to 1
    pub fn new(store: CollectionStore<Record>, capacity: usize) -> Self {
        Self {
            store,
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn store(&self) -> &CollectionStore<Record> {
        &self.store
    }

    /// All entries, newest first
    pub async fn list(&self) -> Vec<Record> {
        self.store.load().await
    }

    /// Record a new entry at the front, evicting the oldest past capacity
    pub async fn append(&self, entry: Record) -> Result<Record, StoreError> {
        let mut history = self.store.lock().await?;
        let stored = ring::push_front(&mut history, entry, self.capacity)?;
        history.commit().await?;
        Ok(stored)
    }

    /// Remove a single entry
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut history = self.store.lock().await?;
        if !ring::remove(&mut history, id) {
            return Err(StoreError::not_found(COLLECTION, id));
        }
        history.commit().await?;
        Ok(())
    }

    /// Remove every entry
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.save(&[]).await?;
        info!("History cleared");
        Ok(())
    }
}
