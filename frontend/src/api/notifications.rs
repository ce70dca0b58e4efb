use serde_json::Value;
use uuid::Uuid;

use super::client::{ApiClient, Service};
use super::error::ApiError;
use super::types::{NotificationListResponse, NotificationUnreadCountResponse};

impl ApiClient {
    pub async fn get_notifications(
        &self,
        page: u32,
        size: u32,
    ) -> Result<NotificationListResponse, ApiError> {
        self.get_json(
            Service::Notification,
            "/notifications/me",
            &[("page", page.to_string()), ("size", size.to_string())],
        )
        .await
    }

    pub async fn get_unread_count(&self) -> Result<NotificationUnreadCountResponse, ApiError> {
        self.get_json(Service::Notification, "/notifications/unread-count", &[])
            .await
    }

    pub async fn mark_one_read(&self, notification_id: Uuid) -> Result<Value, ApiError> {
        self.patch_empty(
            Service::Notification,
            &format!("/notifications/{}/read", notification_id),
        )
        .await
    }

    pub async fn mark_all_read(&self) -> Result<Value, ApiError> {
        self.patch_empty(Service::Notification, "/notifications/read-all")
            .await
    }
}
