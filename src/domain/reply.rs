//! Response envelope handed to the outer surface.
//!
//! Mirrors the shape the desktop tool expects: `{success, data?, error?, message?}`.

use serde::Serialize;
use serde_json::Value;

/// Success/failure envelope with an optional payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Reply {
    /// Successful reply carrying a payload, or a failure if the payload
    /// cannot be represented as JSON
    pub fn data(data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self {
                success: true,
                data: Some(value),
                error: None,
                message: None,
            },
            Err(e) => Self::failure(format!("Failed to serialize response: {}", e)),
        }
    }

    /// Successful acknowledgement without a payload
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            message: Some(message.into()),
        }
    }

    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
