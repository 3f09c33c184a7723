//! Domain types for penguin.
//!
//! This module contains the core data structures:
//! - Record: free-form JSON objects stored in the collections
//! - Asset: scopes and `/files/...` references for extracted images
//! - Reply: the success/failure envelope returned to callers
//! - Request: inbound request bodies

pub mod asset;
pub mod record;
pub mod reply;
pub mod request;

// Re-export commonly used types
pub use asset::{AssetRef, AssetScope};
pub use record::{fields, now_millis, now_rfc3339, Record};
pub use reply::Reply;
pub use request::{ImportRequest, LayoutRequest, ReorderRequest, SaveImageRequest};
