use serde_json::Value;
use uuid::Uuid;

use super::client::{ApiClient, Service};
use super::error::ApiError;
use super::types::{CommentCreate, CommentRead, CommentSearchResponse, CommentUpdate};

impl ApiClient {
    pub async fn create_comment(
        &self,
        thread_id: Uuid,
        request: &CommentCreate,
    ) -> Result<CommentRead, ApiError> {
        self.post_json(
            Service::Discussion,
            &format!("/comments/thread/{}", thread_id),
            request,
        )
        .await
    }

    pub async fn get_comments(&self, thread_id: Uuid) -> Result<Vec<CommentRead>, ApiError> {
        self.get_json(
            Service::Discussion,
            &format!("/comments/thread/{}", thread_id),
            &[],
        )
        .await
    }

    pub async fn search_comments(
        &self,
        q: &str,
        page: u32,
        size: u32,
    ) -> Result<CommentSearchResponse, ApiError> {
        self.get_json(
            Service::Discussion,
            "/comments/search",
            &[
                ("q", q.to_string()),
                ("page", page.to_string()),
                ("size", size.to_string()),
            ],
        )
        .await
    }

    pub async fn update_comment(
        &self,
        comment_id: Uuid,
        request: &CommentUpdate,
    ) -> Result<CommentRead, ApiError> {
        self.patch_json(
            Service::Discussion,
            &format!("/comments/{}", comment_id),
            request,
        )
        .await
    }

    pub async fn delete_comment(&self, comment_id: Uuid) -> Result<Value, ApiError> {
        self.delete_json(Service::Discussion, &format!("/comments/{}", comment_id))
            .await
    }
}
