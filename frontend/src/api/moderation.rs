use super::client::{ApiClient, Service};
use super::error::ApiError;
use super::types::{CommentSearchResponse, ThreadListResponse};

impl ApiClient {
    pub async fn moderation_threads(
        &self,
        q: Option<&str>,
        page: u32,
        size: u32,
    ) -> Result<ThreadListResponse, ApiError> {
        let mut query = vec![("page", page.to_string()), ("size", size.to_string())];
        if let Some(q) = q {
            query.push(("q", q.to_string()));
        }
        self.get_json(Service::Discussion, "/moderation/threads", &query)
            .await
    }

    pub async fn moderation_comments(
        &self,
        q: Option<&str>,
        page: u32,
        size: u32,
    ) -> Result<CommentSearchResponse, ApiError> {
        let mut query = vec![("page", page.to_string()), ("size", size.to_string())];
        if let Some(q) = q {
            query.push(("q", q.to_string()));
        }
        self.get_json(Service::Discussion, "/moderation/comments", &query)
            .await
    }
}
