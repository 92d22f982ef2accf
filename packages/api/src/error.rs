//! # Error taxonomy and message reduction
//!
//! Every failure a screen can see is an [`ApiError`]:
//!
//! | Variant | Cause |
//! |---------|-------|
//! | `Network` / `Timeout` | No response arrived. |
//! | `Http` | Non-2xx status, with whatever body came back. |
//! | `Application` | 2xx envelope with `success: false`. |
//! | `Validation` | Rejected client-side before any request was sent. |
//! | `Decode` | A 2xx body that was not the expected JSON. |
//! | `Storage` | Tokens could not be written to device storage. |
//!
//! [`ApiError::display_message`] reduces any of them to the one string a screen
//! shows. For response bodies it looks at `Message`, then `message`, then a raw
//! string body, and otherwise falls back to [`GENERIC_ERROR_MESSAGE`], so
//! backend casing differences never leak into the UI.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;
use store::ValidationError;
use thiserror::Error;

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Body of a failed HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(Value),
    Text(String),
    Empty,
}

impl ErrorBody {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return ErrorBody::Empty;
        }
        match serde_json::from_str(trimmed) {
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Text(trimmed.to_string()),
        }
    }

    /// `Message`, then `message`, then a bare string body.
    pub fn message(&self) -> Option<&str> {
        let non_empty = |s: &str| !s.trim().is_empty();
        match self {
            ErrorBody::Json(Value::Object(map)) => ["Message", "message"]
                .iter()
                .filter_map(|k| map.get(*k).and_then(Value::as_str))
                .find(|s| non_empty(s)),
            ErrorBody::Json(Value::String(s)) if non_empty(s) => Some(s.as_str()),
            ErrorBody::Text(s) if non_empty(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}")]
    Http { status: u16, body: ErrorBody },

    #[error("{message}")]
    Application {
        message: String,
        errors: BTreeMap<String, Vec<String>>,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("local storage: {0}")]
    Storage(String),
}

impl From<store::StorageError> for ApiError {
    fn from(e: store::StorageError) -> Self {
        ApiError::Storage(e.to_string())
    }
}

impl ApiError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::Validation(ValidationError::new(field, reason))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// No response was received at all.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Timeout(_))
    }

    /// The single human-readable string for this error.
    pub fn display_message(&self) -> String {
        match self {
            ApiError::Http { body, .. } => body
                .message()
                .unwrap_or(GENERIC_ERROR_MESSAGE)
                .to_string(),
            ApiError::Application { message, errors } => {
                if !message.trim().is_empty() {
                    message.clone()
                } else {
                    errors
                        .values()
                        .flatten()
                        .find(|m| !m.trim().is_empty())
                        .cloned()
                        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
                }
            }
            ApiError::Validation(v) => v.reason.clone(),
            ApiError::Network(_)
            | ApiError::Timeout(_)
            | ApiError::Decode(_)
            | ApiError::Storage(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }
}
