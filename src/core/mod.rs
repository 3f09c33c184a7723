//! Core storage logic.
//!
//! This module contains:
//! - CollectionStore: JSON-array file collections with exclusive scopes
//! - Identity: id assignment and dedup keys
//! - Reorder: explicit external ordering
//! - Ring: newest-first bounded history

pub mod error;
pub mod identity;
pub mod reorder;
pub mod ring;
pub mod store;

// Re-export commonly used types
pub use error::StoreError;
pub use identity::{next_id, DedupIndex, DedupKey, IdAllocator};
pub use reorder::reorder;
pub use store::{CollectionGuard, CollectionStore};
