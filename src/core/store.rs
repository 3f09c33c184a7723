//! Durable ordered collections backed by a single JSON array file.
//!
//! Every operation is a full load, an in-memory transformation and a full
//! save. Mutations go through [`CollectionStore::lock`], which holds an
//! exclusive scope for the whole load-transform-save span:
//!
//! - an async mutex owned by the store serializes tasks in this process
//! - an advisory lock on `<file>.lock` serializes other processes
//!
//! Saves write a temporary sibling and rename it into place, so readers never
//! observe a half-written file.

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use super::error::StoreError;

/// A JSON-array file holding one collection
pub struct CollectionStore<T> {
    /// Human-readable collection name (used in errors and logs)
    name: &'static str,

    /// Path to the backing file
    path: PathBuf,

    /// In-process exclusive scope for load-transform-save
    lock: Arc<Mutex<()>>,

    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for CollectionStore<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            path: self.path.clone(),
            lock: Arc::clone(&self.lock),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for CollectionStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionStore")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}

impl<T> CollectionStore<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    /// Create a store for the collection at `path`
    pub fn new(name: &'static str, path: impl Into<PathBuf>) -> Self {
        Self {
            name,
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the path to the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection.
    ///
    /// A missing or unparsable file yields an empty collection; the failure
    /// is logged, never returned.
    pub async fn load(&self) -> Vec<T> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(collection = self.name, "No backing file yet, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(
                    collection = self.name,
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read collection, treating as empty"
                );
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(items) => items,
            Err(e) => {
                warn!(
                    collection = self.name,
                    path = %self.path.display(),
                    error = %e,
                    "Corrupt collection file, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Replace the stored collection with `items`
    pub async fn save(&self, items: &[T]) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let _file_lock = self.acquire_file_lock().await?;
        self.write(items).await
    }

    /// Open an exclusive load-transform-save scope.
    ///
    /// The returned guard derefs to the freshly loaded items. Call
    /// [`CollectionGuard::commit`] to persist; dropping the guard without
    /// committing leaves the file untouched.
    pub async fn lock(&self) -> Result<CollectionGuard<'_, T>, StoreError> {
        let guard = self.lock.lock().await;
        let file_lock = self.acquire_file_lock().await?;
        let items = self.load().await;

        Ok(CollectionGuard {
            store: self,
            items,
            _file_lock: file_lock,
            _guard: guard,
        })
    }

    /// Atomic write: temp + fsync + rename
    async fn write(&self, items: &[T]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(items)?;
        let tmp_path = sibling(&self.path, ".tmp");

        if let Err(e) = replace_file(&tmp_path, &self.path, content.as_bytes()).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        debug!(collection = self.name, count = items.len(), "Saved collection");
        Ok(())
    }

    /// Take the advisory lock on the sidecar lock file
    async fn acquire_file_lock(&self) -> Result<std::fs::File, StoreError> {
        let lock_path = sibling(&self.path, ".lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let file = tokio::task::spawn_blocking(move || -> std::io::Result<std::fs::File> {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&lock_path)?;
            file.lock_exclusive()?;
            Ok(file)
        })
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;

        // Lock is released when the file is dropped
        Ok(file)
    }
}

/// Exclusive access to a loaded collection
pub struct CollectionGuard<'a, T>
where
    T: Serialize + DeserializeOwned + Send,
{
    store: &'a CollectionStore<T>,
    items: Vec<T>,
    _file_lock: std::fs::File,
    _guard: MutexGuard<'a, ()>,
}

impl<T> CollectionGuard<'_, T>
where
    T: Serialize + DeserializeOwned + Send,
{
    /// Swap in a whole new collection
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Persist the (possibly modified) items and release the lock
    pub async fn commit(self) -> Result<Vec<T>, StoreError> {
        self.store.write(&self.items).await?;
        Ok(self.items)
    }
}

impl<T> Deref for CollectionGuard<'_, T>
where
    T: Serialize + DeserializeOwned + Send,
{
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        &self.items
    }
}

impl<T> DerefMut for CollectionGuard<'_, T>
where
    T: Serialize + DeserializeOwned + Send,
{
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }
}

/// Write `bytes` to `tmp_path`, flush it to disk and rename it over `path`
async fn replace_file(tmp_path: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp_path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(tmp_path, path).await
}

/// `<dir>/<file><suffix>`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn create_test_store() -> (CollectionStore<Value>, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = CollectionStore::new("test", temp.path().join("data").join("items.json"));
        (store, temp)
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let (store, _temp) = create_test_store();
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty() {
        let (store, _temp) = create_test_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let (store, _temp) = create_test_store();
        let items = vec![
            json!({"id": 2, "zeta": "z", "alpha": "a"}),
            json!({"id": 1, "nested": {"b": 1, "a": 2}}),
        ];

        store.save(&items).await.unwrap();
        let loaded = store.load().await;

        assert_eq!(loaded, items);
        let keys: Vec<&String> = loaded[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["id", "zeta", "alpha"]);
    }

    #[tokio::test]
    async fn test_save_is_pretty_and_not_ascii_escaped() {
        let (store, _temp) = create_test_store();
        store.save(&[json!({"title": "企鹅 café"})]).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("企鹅 café"));
        assert!(raw.contains("\n  {"));
        assert!(!sibling(store.path(), ".tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_save_leaves_no_temp_file() {
        let (store, _temp) = create_test_store();
        // A non-empty directory in place of the file makes the rename fail
        std::fs::create_dir_all(store.path().join("occupied")).unwrap();

        let err = store.save(&[json!({"id": 1})]).await.unwrap_err();

        assert!(matches!(err, StoreError::Io(_)));
        assert!(!sibling(store.path(), ".tmp").exists());
        assert!(store.path().join("occupied").is_dir());
    }

    #[tokio::test]
    async fn test_failed_temp_write_is_reported() {
        let (store, _temp) = create_test_store();
        // The temp path is a directory, so creating the temp file fails
        std::fs::create_dir_all(sibling(store.path(), ".tmp").join("occupied")).unwrap();

        assert!(store.save(&[json!({"id": 1})]).await.is_err());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_guard_without_commit_does_not_save() {
        let (store, _temp) = create_test_store();
        store.save(&[json!({"id": 1})]).await.unwrap();

        {
            let mut guard = store.lock().await.unwrap();
            guard.push(json!({"id": 2}));
        }

        assert_eq!(store.load().await.len(), 1);
    }

    #[tokio::test]
    async fn test_guard_commit_persists() {
        let (store, _temp) = create_test_store();

        let mut guard = store.lock().await.unwrap();
        guard.push(json!({"id": 1}));
        let saved = guard.commit().await.unwrap();

        assert_eq!(saved.len(), 1);
        assert_eq!(store.load().await, saved);
    }
}
