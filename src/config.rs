//! Configuration for penguin paths.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (PENGUIN_HOME)
//! 2. Config file (.penguin/config.yaml)
//! 3. Defaults (~/.penguin)
//!
//! Config file discovery:
//! - Searches current directory and parents for .penguin/config.yaml
//! - `paths.home` is relative to the .penguin/ directory
//! - Directory overrides (`data`, `input`, ...) are relative to home
//!
//! The resolved configuration is built once by the binary and handed to
//! each component; nothing here is cached globally.

pub mod paths;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::AssetScope;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub history: Option<HistoryConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Service home directory (relative to .penguin/)
    pub home: Option<String>,
    /// Collection files directory (relative to home)
    pub data: Option<String>,
    /// Input images directory (relative to home)
    pub input: Option<String>,
    /// Output images directory (relative to home)
    pub output: Option<String>,
    /// Library images directory (relative to home)
    pub creative: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    pub limit: Option<usize>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// Service home directory
    pub home: PathBuf,
    /// Directory holding the collection files
    pub data_dir: PathBuf,
    /// Directory for input images
    pub input_dir: PathBuf,
    /// Directory for output images
    pub output_dir: PathBuf,
    /// Directory for images extracted from library ideas
    pub creative_dir: PathBuf,
    /// Maximum number of history entries kept
    pub history_limit: usize,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Default layout under `home`
    pub fn rooted_at(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            data_dir: home.join(paths::DATA_DIR_NAME),
            input_dir: home.join(paths::INPUT_DIR_NAME),
            output_dir: home.join(paths::OUTPUT_DIR_NAME),
            creative_dir: home.join(paths::CREATIVE_DIR_NAME),
            history_limit: paths::DEFAULT_HISTORY_LIMIT,
            config_file: None,
            home,
        }
    }

    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        let default_home = dirs::home_dir()
            .context("Failed to determine home directory")?
            .join(paths::HOME_DIR_NAME);
        let env_home = std::env::var(paths::HOME_ENV).ok().map(PathBuf::from);

        let config_file = match find_config_file() {
            Some(path) => {
                let parsed = load_config_file(&path)?;
                Some((path, parsed))
            }
            None => None,
        };

        Ok(resolve(config_file, env_home, default_home))
    }

    /// Directory backing an asset scope
    pub fn scope_dir(&self, scope: AssetScope) -> &Path {
        match scope {
            AssetScope::Creative => &self.creative_dir,
            AssetScope::Input => &self.input_dir,
            AssetScope::Output => &self.output_dir,
        }
    }

    pub fn ideas_file(&self) -> PathBuf {
        self.data_dir.join(paths::IDEAS_FILE)
    }

    pub fn history_file(&self) -> PathBuf {
        self.data_dir.join(paths::HISTORY_FILE)
    }

    pub fn layout_file(&self) -> PathBuf {
        self.data_dir.join(paths::LAYOUT_FILE)
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current
            .join(paths::CONFIG_DIR_NAME)
            .join(paths::CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge the config sources into absolute paths
fn resolve(
    config_file: Option<(PathBuf, ConfigFile)>,
    env_home: Option<PathBuf>,
    default_home: PathBuf,
) -> ResolvedConfig {
    let Some((config_path, config)) = config_file else {
        return ResolvedConfig::rooted_at(env_home.unwrap_or(default_home));
    };

    let home = if let Some(env_home) = env_home {
        env_home
    } else if let Some(ref home_path) = config.paths.home {
        let penguin_dir = config_path.parent().unwrap_or(Path::new("."));
        resolve_path(penguin_dir, home_path)
    } else {
        default_home
    };

    let mut resolved = ResolvedConfig::rooted_at(&home);
    let overrides = [
        (&config.paths.data, &mut resolved.data_dir),
        (&config.paths.input, &mut resolved.input_dir),
        (&config.paths.output, &mut resolved.output_dir),
        (&config.paths.creative, &mut resolved.creative_dir),
    ];
    for (value, slot) in overrides {
        if let Some(dir) = value {
            *slot = resolve_path(&home, dir);
        }
    }

    if let Some(limit) = config.history.as_ref().and_then(|h| h.limit) {
        if limit == 0 {
            warn!(path = %config_path.display(), "history.limit must be at least 1, using 1");
        }
        resolved.history_limit = limit.max(1);
    }
    resolved.config_file = Some(config_path);
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let resolved = resolve(None, None, PathBuf::from("/home/u/.penguin"));

        assert_eq!(resolved.home, PathBuf::from("/home/u/.penguin"));
        assert_eq!(resolved.data_dir, PathBuf::from("/home/u/.penguin/data"));
        assert_eq!(
            resolved.ideas_file(),
            PathBuf::from("/home/u/.penguin/data/creative_ideas.json")
        );
        assert_eq!(resolved.history_limit, 500);
        assert!(resolved.config_file.is_none());
    }

    #[test]
    fn test_env_home_wins() {
        let resolved = resolve(
            None,
            Some(PathBuf::from("/srv/penguin")),
            PathBuf::from("/home/u/.penguin"),
        );
        assert_eq!(resolved.output_dir, PathBuf::from("/srv/penguin/output"));
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let penguin_dir = temp.path().join(".penguin");
        std::fs::create_dir_all(&penguin_dir).unwrap();

        let config_path = penguin_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
paths:
  home: ../workshop
  creative: library_images
history:
  limit: 50
"#
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.home, Some("../workshop".to_string()));
        assert_eq!(config.history.as_ref().unwrap().limit, Some(50));

        let resolved = resolve(Some((config_path.clone(), config)), None, PathBuf::from("/unused"));
        let home = penguin_dir.join("../workshop");
        assert_eq!(resolved.home, home);
        assert_eq!(resolved.creative_dir, home.join("library_images"));
        assert_eq!(resolved.input_dir, home.join("input"));
        assert_eq!(resolved.history_limit, 50);
        assert_eq!(resolved.config_file, Some(config_path));
    }

    #[test]
    fn test_scope_dir_mapping() {
        let config = ResolvedConfig::rooted_at("/test");

        assert_eq!(
            config.scope_dir(AssetScope::Creative),
            Path::new("/test/creative_images")
        );
        assert_eq!(config.scope_dir(AssetScope::Input), Path::new("/test/input"));
        assert_eq!(config.scope_dir(AssetScope::Output), Path::new("/test/output"));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }

    #[test]
    fn test_zero_history_limit_is_raised_to_one() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        std::fs::write(&config_path, "version: \"1.0\"\nhistory:\n  limit: 0\n").unwrap();

        let config = load_config_file(&config_path).unwrap();
        let resolved = resolve(Some((config_path, config)), None, PathBuf::from("/unused"));
        assert_eq!(resolved.history_limit, 1);
    }
}
