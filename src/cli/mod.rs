//! Command-line interface for penguin.
//!
//! Provides commands for managing the idea library, the generation history,
//! the desktop layout and the asset directories. Every command prints the
//! `{success, data, error, message}` envelope as JSON.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::config::ResolvedConfig;
use crate::core::StoreError;
use crate::domain::request::parse;
use crate::domain::{
    AssetScope, ImportRequest, LayoutRequest, Record, ReorderRequest, Reply, SaveImageRequest,
};
use crate::library::Workspace;

/// penguin - local companion service for the creative tool
#[derive(Parser, Debug)]
#[command(name = "penguin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Home directory (overrides PENGUIN_HOME and the config file)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the idea library
    Ideas {
        #[command(subcommand)]
        command: IdeaCommands,
    },

    /// Manage the generation history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },

    /// Show or replace the desktop layout
    Layout {
        #[command(subcommand)]
        command: LayoutCommands,
    },

    /// Manage image files in an asset scope
    Files {
        #[command(subcommand)]
        command: FileCommands,
    },

    /// Show service status and resolved directories
    Status,
}

#[derive(Subcommand, Debug)]
pub enum IdeaCommands {
    /// List all ideas
    List,

    /// Show a single idea
    Show { id: i64 },

    /// Create an idea from a JSON object
    Add {
        /// JSON file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Merge a JSON object into an existing idea
    Update {
        id: i64,

        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Delete an idea
    Delete { id: i64 },

    /// Bulk import `{ "ideas": [...] }` (or a bare array), skipping duplicates
    Import {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Reorder ideas; unlisted ideas keep their relative order at the end
    Reorder {
        /// Idea IDs in the desired order
        #[arg(conflicts_with = "input")]
        ids: Vec<i64>,

        /// JSON file with `{ "orderedIds": [...] }` (reads from stdin if no IDs are given)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Move images still embedded in the library into files
    Migrate,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List entries, newest first
    List,

    /// Append an entry from a JSON object
    Add {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Delete a single entry
    Delete { id: i64 },

    /// Delete every entry
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum LayoutCommands {
    /// Show the stored layout items
    Show,

    /// Replace the layout with `{ "items": [...] }`
    Save {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// Save `{ "imageData": ..., "filename"?: ... }` into a scope
    Save {
        /// Asset scope (input, output, creative)
        scope: AssetScope,

        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// List image files in a scope, newest first
    List { scope: AssetScope },

    /// Delete a file from a scope
    Delete { scope: AssetScope, filename: String },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<Reply> {
        let mut config = ResolvedConfig::load()?;
        if let Some(home) = self.home {
            let history_limit = config.history_limit;
            config = ResolvedConfig::rooted_at(home);
            config.history_limit = history_limit;
        }
        let workspace = Workspace::new(config);

        let outcome = match self.command {
            Commands::Ideas { command } => execute_ideas(&workspace, command).await?,
            Commands::History { command } => execute_history(&workspace, command).await?,
            Commands::Layout { command } => execute_layout(&workspace, command).await?,
            Commands::Files { command } => execute_files(&workspace, command).await?,
            Commands::Status => Ok(Reply::data(workspace.status().await)),
        };

        Ok(outcome.unwrap_or_else(|e| {
            if e.is_client_error() {
                warn!(error = %e, "Request rejected");
            } else {
                error!(error = %e, "Request failed");
            }
            Reply::failure(e)
        }))
    }
}

/// Outer `Result` is a CLI failure (bad input file); inner is the operation's
type Outcome = Result<Result<Reply, StoreError>>;

async fn execute_ideas(workspace: &Workspace, command: IdeaCommands) -> Outcome {
    let ideas = workspace.ideas();

    Ok(match command {
        IdeaCommands::List => Ok(Reply::data(ideas.list().await)),
        IdeaCommands::Show { id } => ideas.get(id).await.map(Reply::data),
        IdeaCommands::Add { input } => {
            let body = read_body(input)?;
            match Record::from_value(body) {
                Ok(record) => ideas.create(record).await.map(stored_reply),
                Err(e) => Err(e),
            }
        }
        IdeaCommands::Update { id, input } => {
            let body = read_body(input)?;
            match Record::from_value(body) {
                Ok(patch) => ideas.update(id, patch).await.map(stored_reply),
                Err(e) => Err(e),
            }
        }
        IdeaCommands::Delete { id } => ideas.delete(id).await.map(|()| Reply::ok("Deleted")),
        IdeaCommands::Import { input } => {
            let body = match read_body(input)? {
                Value::Array(items) => json!({ "ideas": items }),
                other => other,
            };
            match parse::<ImportRequest>(body) {
                Ok(request) => ideas.import(request.ideas).await.map(|outcome| {
                    let message = outcome.summary();
                    Reply::data(outcome).with_message(message)
                }),
                Err(e) => Err(e),
            }
        }
        IdeaCommands::Reorder { ids, input } => {
            let request = if ids.is_empty() {
                parse::<ReorderRequest>(read_body(input)?)
            } else {
                Ok(ReorderRequest { ordered_ids: ids })
            };
            match request {
                Ok(request) => ideas
                    .reorder(&request.ordered_ids)
                    .await
                    .map(|()| Reply::ok("Order updated")),
                Err(e) => Err(e),
            }
        }
        IdeaCommands::Migrate => ideas.migrate_images().await.map(Reply::data),
    })
}

async fn execute_history(workspace: &Workspace, command: HistoryCommands) -> Outcome {
    let history = workspace.history();

    Ok(match command {
        HistoryCommands::List => Ok(Reply::data(history.list().await)),
        HistoryCommands::Add { input } => {
            let body = read_body(input)?;
            match Record::from_value(body) {
                Ok(entry) => history.append(entry).await.map(Reply::data),
                Err(e) => Err(e),
            }
        }
        HistoryCommands::Delete { id } => history.delete(id).await.map(|()| Reply::ok("Deleted")),
        HistoryCommands::Clear => history.clear().await.map(|()| Reply::ok("History cleared")),
    })
}

async fn execute_layout(workspace: &Workspace, command: LayoutCommands) -> Outcome {
    let layout = workspace.layout();

    Ok(match command {
        LayoutCommands::Show => Ok(Reply::data(layout.load().await)),
        LayoutCommands::Save { input } => match parse::<LayoutRequest>(read_body(input)?) {
            Ok(request) => layout
                .save(&request.items)
                .await
                .map(|()| Reply::ok("Layout saved")),
            Err(e) => Err(e),
        },
    })
}

async fn execute_files(workspace: &Workspace, command: FileCommands) -> Outcome {
    Ok(match command {
        FileCommands::Save { scope, input } => {
            match parse::<SaveImageRequest>(read_body(input)?) {
                Ok(request) => workspace
                    .assets(scope)
                    .save_image(request.image_data.as_deref(), request.filename.as_deref())
                    .await
                    .map(Reply::data)
                    .map_err(StoreError::from),
                Err(e) => Err(e),
            }
        }
        FileCommands::List { scope } => workspace
            .assets(scope)
            .list_images()
            .await
            .map(Reply::data)
            .map_err(StoreError::from),
        FileCommands::Delete { scope, filename } => workspace
            .assets(scope)
            .delete_file(&filename)
            .await
            .map(|()| Reply::ok("File deleted"))
            .map_err(StoreError::from),
    })
}

fn stored_reply(stored: crate::library::Stored) -> Reply {
    let reply = Reply::data(stored.record);
    match stored.warning {
        Some(warning) => reply.with_message(format!("Image not extracted: {}", warning)),
        None => reply,
    }
}

/// Read a JSON body from a file or piped stdin; no input means `{}`
fn read_body(input_file: Option<PathBuf>) -> Result<Value> {
    let input = if let Some(path) = input_file {
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?
    } else if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        String::new()
    };

    if input.trim().is_empty() {
        return Ok(json!({}));
    }

    serde_json::from_str(&input).context("Input is not valid JSON")
}
