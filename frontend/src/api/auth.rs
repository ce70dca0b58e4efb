use serde_json::{json, Value};
use uuid::Uuid;

use super::client::{ApiClient, Service};
use super::error::ApiError;
use super::types::{
    ChangePasswordRequest, LoginRequest, MentionResolveResponse, MentionSuggestResponse,
    MessageResponse, RegisterRequest, ResetPasswordRequest, TokenResponse, UserListResponse,
    UserRead, UserSearchResponse, UserUpdate,
};

impl ApiClient {
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserRead, ApiError> {
        self.post_json(Service::Auth, "/auth/register", request).await
    }

    /// Exchange credentials for a token pair. Persisting the pair is the
    /// session store's job, not the transport's.
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.post_json(Service::Auth, "/auth/login", request).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        self.post_json(Service::Auth, "/auth/forgot-password", &json!({ "email": email }))
            .await
    }

    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.post_json(Service::Auth, "/auth/reset-password", request)
            .await
    }

    pub async fn get_me(&self) -> Result<UserRead, ApiError> {
        self.get_json(Service::Auth, "/users/me", &[]).await
    }

    pub async fn update_profile(&self, update: &UserUpdate) -> Result<UserRead, ApiError> {
        self.patch_json(Service::Auth, "/users/me", update).await
    }

    pub async fn change_my_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<Value, ApiError> {
        self.post_json(Service::Auth, "/users/me/change-password", request)
            .await
    }

    pub async fn deactivate_my_account(&self) -> Result<Value, ApiError> {
        self.post_empty(Service::Auth, "/users/me/deactivate", &[])
            .await
    }

    pub async fn suggest_mention_users(
        &self,
        q: &str,
        limit: u32,
    ) -> Result<MentionSuggestResponse, ApiError> {
        self.get_json(
            Service::Auth,
            "/users/mentions/suggest",
            &[("q", q.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    pub async fn resolve_mentions(
        &self,
        usernames: &[String],
    ) -> Result<MentionResolveResponse, ApiError> {
        self.post_json(
            Service::Auth,
            "/users/mentions/resolve",
            &json!({ "usernames": usernames }),
        )
        .await
    }

    pub async fn search_users(
        &self,
        q: &str,
        page: u32,
        size: u32,
    ) -> Result<UserSearchResponse, ApiError> {
        self.get_json(
            Service::Auth,
            "/users/search",
            &[
                ("q", q.to_string()),
                ("page", page.to_string()),
                ("size", size.to_string()),
            ],
        )
        .await
    }

    // ---- admin ----

    pub async fn admin_list_users(
        &self,
        page: u32,
        size: u32,
        q: Option<&str>,
        role: Option<&str>,
    ) -> Result<UserListResponse, ApiError> {
        let mut query = vec![("page", page.to_string()), ("size", size.to_string())];
        if let Some(q) = q {
            query.push(("q", q.to_string()));
        }
        if let Some(role) = role {
            query.push(("role", role.to_string()));
        }
        self.get_json(Service::Auth, "/users/admin/list", &query).await
    }

    pub async fn admin_update_user_status(
        &self,
        user_id: Uuid,
        is_active: bool,
    ) -> Result<UserRead, ApiError> {
        self.patch_json(
            Service::Auth,
            &format!("/users/{}/status", user_id),
            &json!({ "is_active": is_active }),
        )
        .await
    }

    pub async fn admin_promote_user(
        &self,
        user_id: Uuid,
        role_name: &str,
    ) -> Result<Value, ApiError> {
        self.post_empty(
            Service::Auth,
            &format!("/users/{}/promote", user_id),
            &[("role_name", role_name.to_string())],
        )
        .await
    }

    pub async fn admin_demote_user(
        &self,
        user_id: Uuid,
        role_name: &str,
    ) -> Result<Value, ApiError> {
        self.post_empty(
            Service::Auth,
            &format!("/users/{}/demote", user_id),
            &[("role_name", role_name.to_string())],
        )
        .await
    }
}
