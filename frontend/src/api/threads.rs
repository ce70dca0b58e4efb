use serde_json::Value;
use uuid::Uuid;

use super::client::{ApiClient, Service};
use super::error::ApiError;
use super::types::{ThreadCreate, ThreadListResponse, ThreadRead, ThreadUpdate};

impl ApiClient {
    pub async fn create_thread(&self, request: &ThreadCreate) -> Result<ThreadRead, ApiError> {
        self.post_json(Service::Discussion, "/threads/", request).await
    }

    pub async fn get_threads(&self, page: u32, size: u32) -> Result<ThreadListResponse, ApiError> {
        self.get_json(
            Service::Discussion,
            "/threads/",
            &[("page", page.to_string()), ("size", size.to_string())],
        )
        .await
    }

    pub async fn search_threads(
        &self,
        q: &str,
        page: u32,
        size: u32,
    ) -> Result<ThreadListResponse, ApiError> {
        self.get_json(
            Service::Discussion,
            "/threads/search",
            &[
                ("q", q.to_string()),
                ("page", page.to_string()),
                ("size", size.to_string()),
            ],
        )
        .await
    }

    pub async fn get_thread(&self, thread_id: Uuid) -> Result<ThreadRead, ApiError> {
        self.get_json(Service::Discussion, &format!("/threads/{}", thread_id), &[])
            .await
    }

    pub async fn update_thread(
        &self,
        thread_id: Uuid,
        update: &ThreadUpdate,
    ) -> Result<ThreadRead, ApiError> {
        self.patch_json(Service::Discussion, &format!("/threads/{}", thread_id), update)
            .await
    }

    pub async fn delete_thread(&self, thread_id: Uuid) -> Result<Value, ApiError> {
        self.delete_json(Service::Discussion, &format!("/threads/{}", thread_id))
            .await
    }
}
