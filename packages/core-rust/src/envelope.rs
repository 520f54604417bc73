//! JSON wire envelopes shared by handlers and tests.

use serde::{Deserialize, Serialize};

/// Standard success envelope: `{success, data, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true` on this envelope; failures use the error shapes below.
    pub success: bool,
    /// Operation-specific payload.
    pub data: T,
    /// Human-readable status message.
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// Builds a success envelope around `data`.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }
}

/// Canonical body for unmatched routes: `{"message":"Not Found","status":404}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotFoundBody {
    /// Fixed message text.
    pub message: String,
    /// Mirrors the HTTP status code.
    pub status: u16,
}

impl Default for NotFoundBody {
    fn default() -> Self {
        Self {
            message: "Not Found".to_string(),
            status: 404,
        }
    }
}

/// Body for schema-validation failures, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationBody {
    /// Always `false`.
    pub success: bool,
    /// Name of the request field that failed validation.
    pub field: String,
    /// What was wrong with it.
    pub message: String,
}

impl ValidationBody {
    /// Builds a validation-failure body for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            field: field.into(),
            message: message.into(),
        }
    }
}
