use serde_json::Value;
use thiserror::Error;

/// Errors crossing the gateway boundary.
///
/// `Clone` is required because the outcome of the shared in-flight refresh
/// future is handed to every request waiting on it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Network(String),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Session expired: {0}")]
    SessionExpired(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired(_))
    }
}

const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Extract a human-readable message from a FastAPI-style error body.
/// `detail` may be a plain string, a list of validation errors with
/// `msg`/`loc` fields, or an object carrying a `message`.
pub fn error_message_from_body(body: &Value) -> String {
    match body.get("detail") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Array(items)) if !items.is_empty() => match &items[0] {
            Value::String(s) if !s.trim().is_empty() => s.clone(),
            Value::Object(first) => {
                let msg = first.get("msg").and_then(Value::as_str).unwrap_or("");
                let loc = first
                    .get("loc")
                    .and_then(Value::as_array)
                    .map(|parts| {
                        parts
                            .iter()
                            .filter_map(|p| match p {
                                Value::String(s) => Some(s.clone()),
                                other => Some(other.to_string()),
                            })
                            .collect::<Vec<_>>()
                            .join(".")
                    })
                    .unwrap_or_default();
                match (msg.is_empty(), loc.is_empty()) {
                    (false, false) => format!("{} ({})", msg, loc),
                    (false, true) => msg.to_string(),
                    _ => FALLBACK_MESSAGE.to_string(),
                }
            }
            _ => FALLBACK_MESSAGE.to_string(),
        },
        Some(Value::Object(detail)) => detail
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(FALLBACK_MESSAGE)
            .to_string(),
        _ => FALLBACK_MESSAGE.to_string(),
    }
}
