//! Asset scopes and references.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::paths::FILES_PREFIX;

/// Where an extracted asset lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetScope {
    /// Images attached to library ideas
    Creative,

    /// User-supplied input images
    Input,

    /// Generated output images
    Output,
}

impl AssetScope {
    /// Path segment used in references (`/files/<scope>/...`)
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetScope::Creative => "creative",
            AssetScope::Input => "input",
            AssetScope::Output => "output",
        }
    }

    /// Filename prefix for generated names
    pub fn file_prefix(&self) -> &'static str {
        match self {
            AssetScope::Creative => "creative",
            AssetScope::Input => "input",
            AssetScope::Output => "penguin",
        }
    }
}

impl fmt::Display for AssetScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "creative" | "library" => Ok(AssetScope::Creative),
            "input" | "in" => Ok(AssetScope::Input),
            "output" | "out" => Ok(AssetScope::Output),
            _ => anyhow::bail!("Unknown asset scope: {}", s),
        }
    }
}

/// Stable locator of a materialized asset: `/files/<scope>/<filename>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(scope: AssetScope, filename: &str) -> Self {
        Self(format!("{}{}/{}", FILES_PREFIX, scope.as_str(), filename))
    }

    /// Whether a string already is a materialized reference
    pub fn is_reference(value: &str) -> bool {
        value.starts_with(FILES_PREFIX)
    }

    /// Split a reference back into scope and filename
    pub fn parse(value: &str) -> Option<(AssetScope, &str)> {
        let rest = value.strip_prefix(FILES_PREFIX)?;
        let (scope, filename) = rest.split_once('/')?;
        let scope = scope.parse().ok()?;
        if filename.is_empty() || filename.contains('/') {
            return None;
        }
        Some((scope, filename))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AssetRef> for String {
    fn from(r: AssetRef) -> Self {
        r.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_format() {
        let r = AssetRef::new(AssetScope::Creative, "creative_0123456789ab.png");
        assert_eq!(r.as_str(), "/files/creative/creative_0123456789ab.png");
        assert!(AssetRef::is_reference(r.as_str()));
    }

    #[test]
    fn test_parse_round_trip() {
        let r = AssetRef::new(AssetScope::Output, "a.jpg");
        assert_eq!(AssetRef::parse(r.as_str()), Some((AssetScope::Output, "a.jpg")));
        assert_eq!(AssetRef::parse("/files/unknown/a.jpg"), None);
        assert_eq!(AssetRef::parse("/files/input/"), None);
        assert_eq!(AssetRef::parse("https://example.com/a.png"), None);
    }

    #[test]
    fn test_scope_from_str() {
        assert_eq!("OUTPUT".parse::<AssetScope>().unwrap(), AssetScope::Output);
        assert!("desktop".parse::<AssetScope>().is_err());
    }
}
