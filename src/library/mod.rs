//! Persistent collections for the creative tool.
//!
//! A [`Workspace`] wires the collections and asset scopes to the directories
//! of a [`ResolvedConfig`].
//!
//! # Storage Layout
//!
//! ```text
//! <home>/
//! ├── data/
//! │   ├── creative_ideas.json   # Idea library (array, stored order)
//! │   ├── history.json          # Generation history (newest first, ≤ 500)
//! │   └── desktop_items.json    # Desktop layout (replaced on save)
//! ├── creative_images/
//! ├── input/
//! └── output/
//! ```

pub mod history;
pub mod ideas;
pub mod layout;

use std::path::PathBuf;

use serde::Serialize;

use crate::config::ResolvedConfig;
use crate::core::CollectionStore;
use crate::domain::{AssetRef, AssetScope};
use crate::media::{validate_filename, MediaExtractor};

pub use history::History;
pub use ideas::{IdeaLibrary, ImportOutcome, MigrationReport, Stored};
pub use layout::Layout;

/// All collections and asset scopes of one penguin home
#[derive(Debug, Clone)]
pub struct Workspace {
    config: ResolvedConfig,
    ideas: IdeaLibrary,
    history: History,
    layout: Layout,
    input: MediaExtractor,
    output: MediaExtractor,
}

/// Service status summary
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    pub status: &'static str,
    pub version: &'static str,
    pub mode: &'static str,
    pub data_dir: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub creative_dir: PathBuf,
    pub ideas: usize,
    pub history: usize,
}

impl Workspace {
    pub fn new(config: ResolvedConfig) -> Self {
        let ideas = IdeaLibrary::new(
            CollectionStore::new(ideas::COLLECTION, config.ideas_file()),
            MediaExtractor::new(AssetScope::Creative, &config.creative_dir),
        );
        let history = History::new(
            CollectionStore::new(history::COLLECTION, config.history_file()),
            config.history_limit,
        );
        let layout = Layout::new(CollectionStore::new(layout::COLLECTION, config.layout_file()));

        Self {
            ideas,
            history,
            layout,
            input: MediaExtractor::new(AssetScope::Input, &config.input_dir),
            output: MediaExtractor::new(AssetScope::Output, &config.output_dir),
            config,
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn ideas(&self) -> &IdeaLibrary {
        &self.ideas
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// File operations for an asset scope
    pub fn assets(&self, scope: AssetScope) -> &MediaExtractor {
        match scope {
            AssetScope::Creative => self.ideas.extractor(),
            AssetScope::Input => &self.input,
            AssetScope::Output => &self.output,
        }
    }

    /// Map a `/files/<scope>/<filename>` reference back to its file path
    pub fn locate(&self, reference: &str) -> Option<PathBuf> {
        let (scope, filename) = AssetRef::parse(reference)?;
        let filename = validate_filename(filename).ok()?;
        Some(self.config.scope_dir(scope).join(filename))
    }

    pub async fn status(&self) -> Status {
        Status {
            status: "running",
            version: env!("CARGO_PKG_VERSION"),
            mode: "local",
            data_dir: self.config.data_dir.clone(),
            input_dir: self.config.input_dir.clone(),
            output_dir: self.config.output_dir.clone(),
            creative_dir: self.config.creative_dir.clone(),
            ideas: self.ideas.list().await.len(),
            history: self.history.list().await.len(),
        }
    }
}
