//! penguin - local companion service for a desktop creative tool
//!
//! Persists an idea library, a generation history and a desktop layout as
//! flat JSON files, and turns images embedded as base64 data URLs into files
//! addressed by `/files/<scope>/<filename>` references.
//!
//! # Architecture
//!
//! Every operation reloads its collection from disk, transforms it in
//! memory and writes it back atomically while holding that collection's
//! exclusive lock:
//! - Ideas get monotonic ids; bulk import drops (title, prompt) duplicates
//! - History is newest first and capped (500 by default)
//! - Layout is replaced wholesale
//!
//! # Modules
//!
//! - `core`: Collection store, identity & dedup, reorder, history ring
//! - `media`: Embedded payload extraction and asset files
//! - `library`: Idea library, history and layout services
//! - `domain`: Records, asset references, request/reply shapes
//! - `config`: Path resolution
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Import ideas, skipping duplicates
//! penguin ideas import --input ideas.json
//!
//! # Record a generation
//! echo '{"prompt": "a penguin"}' | penguin history add
//!
//! # Reorder the library
//! penguin ideas reorder 3 1 2
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod library;
pub mod media;

// Re-export main types at crate root for convenience
pub use config::ResolvedConfig;
pub use core::{CollectionStore, StoreError};
pub use domain::{AssetRef, AssetScope, Record, Reply};
pub use library::{History, IdeaLibrary, ImportOutcome, Layout, Workspace};
pub use media::{MediaError, MediaExtractor};
