//! Desktop layout: opaque placement items, replaced wholesale on save.

use serde_json::Value;

use crate::core::{CollectionStore, StoreError};

/// Collection name used in errors and logs
pub const COLLECTION: &str = "Layout";

#[derive(Debug, Clone)]
pub struct Layout {
    store: CollectionStore<Value>,
}

impl Layout {
    pub fn new(store: CollectionStore<Value>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Vec<Value> {
        self.store.load().await
    }

    /// Replace the stored layout with `items`
    pub async fn save(&self, items: &[Value]) -> Result<(), StoreError> {
        self.store.save(items).await
    }
}
