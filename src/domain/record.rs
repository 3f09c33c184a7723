//! Free-form JSON records stored in the collections.
//!
//! Library items and history entries are caller-defined objects. The service
//! only owns a handful of well-known fields (`id`, timestamps, `order`,
//! `imageUrl`); everything else is carried through untouched and in the
//! caller's field order.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::StoreError;

/// Well-known field names
pub mod fields {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const PROMPT: &str = "prompt";
    pub const IMAGE_URL: &str = "imageUrl";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
    pub const ORDER: &str = "order";
    pub const TIMESTAMP: &str = "timestamp";
}

/// A JSON object record with typed access to the fields the service manages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Accept an inbound JSON value, rejecting anything that isn't an object
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(StoreError::InvalidInput(format!(
                "expected a JSON object, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Integer identity, if present
    pub fn id(&self) -> Option<i64> {
        self.0.get(fields::ID).and_then(Value::as_i64)
    }

    pub fn set_id(&mut self, id: i64) {
        self.0.insert(fields::ID.to_string(), Value::from(id));
    }

    /// String field, or empty when missing or not a string
    pub fn text(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn title(&self) -> &str {
        self.text(fields::TITLE)
    }

    pub fn prompt(&self) -> &str {
        self.text(fields::PROMPT)
    }

    /// Image reference or embedded payload
    pub fn image_url(&self) -> Option<&str> {
        self.0.get(fields::IMAGE_URL).and_then(Value::as_str)
    }

    pub fn set_image_url(&mut self, url: impl Into<String>) {
        self.0
            .insert(fields::IMAGE_URL.to_string(), Value::String(url.into()));
    }

    pub fn order(&self) -> Option<i64> {
        self.0.get(fields::ORDER).and_then(Value::as_i64)
    }

    pub fn set_order(&mut self, order: usize) {
        self.0.insert(fields::ORDER.to_string(), Value::from(order));
    }

    /// Epoch milliseconds of a history entry
    pub fn timestamp(&self) -> Option<i64> {
        self.0.get(fields::TIMESTAMP).and_then(Value::as_i64)
    }

    /// Stamp a new record: both `createdAt` and `updatedAt` set to now
    pub fn stamp_created(&mut self) {
        let now = now_rfc3339();
        self.0
            .insert(fields::CREATED_AT.to_string(), Value::String(now.clone()));
        self.0
            .insert(fields::UPDATED_AT.to_string(), Value::String(now));
    }

    /// Refresh `updatedAt` only
    pub fn touch(&mut self) {
        self.0
            .insert(fields::UPDATED_AT.to_string(), Value::String(now_rfc3339()));
    }

    /// Shallow-merge `patch` over this record.
    ///
    /// `id` and `createdAt` keep their stored values regardless of what the
    /// patch carries; `updatedAt` is refreshed.
    pub fn merge(&mut self, patch: Record) {
        let id = self.0.get(fields::ID).cloned();
        let created = self.0.get(fields::CREATED_AT).cloned();

        for (key, value) in patch.0 {
            self.0.insert(key, value);
        }

        match id {
            Some(id) => self.0.insert(fields::ID.to_string(), id),
            None => self.0.remove(fields::ID),
        };
        match created {
            Some(created) => self.0.insert(fields::CREATED_AT.to_string(), created),
            None => self
                .0
                .insert(fields::CREATED_AT.to_string(), Value::String(now_rfc3339())),
        };
        self.touch();
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Current time as an RFC 3339 string with millisecond precision
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time as epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        let err = Record::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
        assert!(Record::from_value(json!("text")).is_err());
    }

    #[test]
    fn test_text_fields_default_to_empty() {
        let r = record(json!({"title": "Cat", "prompt": 42}));
        assert_eq!(r.title(), "Cat");
        assert_eq!(r.prompt(), "");
        assert_eq!(r.text("missing"), "");
    }

    #[test]
    fn test_merge_preserves_identity_and_creation() {
        let mut stored = record(json!({
            "id": 3,
            "title": "Old",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z",
            "tags": ["a"]
        }));
        let patch = record(json!({
            "id": 99,
            "title": "New",
            "createdAt": "1999-01-01T00:00:00.000Z"
        }));

        stored.merge(patch);

        assert_eq!(stored.id(), Some(3));
        assert_eq!(stored.title(), "New");
        assert_eq!(stored.text(fields::CREATED_AT), "2024-01-01T00:00:00.000Z");
        assert_ne!(stored.text(fields::UPDATED_AT), "2024-01-01T00:00:00.000Z");
        assert_eq!(stored.get("tags"), Some(&json!(["a"])));
    }

    #[test]
    fn test_field_order_is_preserved() {
        let r = record(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<&str> = r.as_map().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_stamp_created_sets_both_timestamps() {
        let mut r = Record::new();
        r.stamp_created();
        assert!(!r.text(fields::CREATED_AT).is_empty());
        assert_eq!(r.text(fields::CREATED_AT), r.text(fields::UPDATED_AT));
    }
}
