//! Inbound request bodies.

use serde::Deserialize;
use serde_json::Value;

use super::Record;
use crate::core::StoreError;

/// `{ ideas: [record] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub ideas: Vec<Record>,
}

/// `{ orderedIds: [int] }`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    #[serde(default)]
    pub ordered_ids: Vec<i64>,
}

/// `{ items: [any] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutRequest {
    #[serde(default)]
    pub items: Vec<Value>,
}

/// `{ imageData, filename? }`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveImageRequest {
    #[serde(default)]
    pub image_data: Option<String>,

    #[serde(default)]
    pub filename: Option<String>,
}

/// Parse a request body, mapping shape errors to `InvalidInput`
pub fn parse<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, StoreError> {
    serde_json::from_value(body).map_err(|e| StoreError::InvalidInput(e.to_string()))
}
