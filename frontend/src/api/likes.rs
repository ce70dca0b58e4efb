use serde_json::Value;
use uuid::Uuid;

use super::client::{ApiClient, Service};
use super::error::ApiError;

impl ApiClient {
    pub async fn toggle_thread_like(&self, thread_id: Uuid) -> Result<Value, ApiError> {
        self.post_empty(Service::Discussion, &format!("/likes/thread/{}", thread_id), &[])
            .await
    }

    pub async fn toggle_comment_like(&self, comment_id: Uuid) -> Result<Value, ApiError> {
        self.post_empty(
            Service::Discussion,
            &format!("/likes/comment/{}", comment_id),
            &[],
        )
        .await
    }
}
