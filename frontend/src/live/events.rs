use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

/// A server-pushed change event as published by the realtime service.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveEvent {
    pub event: String,
    #[serde(default)]
    pub event_id: Option<Uuid>,
    #[serde(default)]
    pub thread_id: Option<Uuid>,
    #[serde(default)]
    pub actor_id: Option<Uuid>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub payload: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Recognized event kinds. Anything else maps to `Other`, a
/// forward-compatible no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ThreadCreated,
    ThreadUpdated,
    ThreadDeleted,
    ThreadLikeUpdated,
    CommentCreated,
    CommentUpdated,
    CommentDeleted,
    CommentLikeUpdated,
    Other,
}

impl LiveEvent {
    pub fn kind(&self) -> EventKind {
        match self.event.as_str() {
            "thread.created" => EventKind::ThreadCreated,
            "thread.updated" => EventKind::ThreadUpdated,
            "thread.deleted" => EventKind::ThreadDeleted,
            "thread.like.updated" => EventKind::ThreadLikeUpdated,
            "comment.created" => EventKind::CommentCreated,
            "comment.updated" => EventKind::CommentUpdated,
            "comment.deleted" => EventKind::CommentDeleted,
            "comment.like.updated" => EventKind::CommentLikeUpdated,
            _ => EventKind::Other,
        }
    }

    /// Human-readable message, preferring the payload's over the
    /// top-level field.
    pub fn display_message(&self) -> Option<&str> {
        self.payload
            .as_ref()
            .and_then(|p| p.get("message"))
            .and_then(Value::as_str)
            .or(self.message.as_deref())
    }
}
