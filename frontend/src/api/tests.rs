#![cfg(not(coverage))]

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use futures::future::join_all;
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::json;

use super::client::ApiClient;
use super::error::ApiError;
use super::types::LoginRequest;
use crate::config::ServiceUrls;
use crate::utils::tokens::{MemoryTokenStore, TokenStore};

struct Harness {
    api: ApiClient,
    tokens: Rc<MemoryTokenStore>,
    expired_calls: Rc<Cell<u32>>,
}

/// Gateway wired to the mock server with the stale pair ("old", "r1")
/// already stored.
fn harness(server: &MockServer) -> Harness {
    let base = server.base_url();
    let urls = ServiceUrls::new(&base, &base, &base, "ws://localhost:8002");
    let tokens = Rc::new(MemoryTokenStore::with_tokens("old", "r1"));
    let expired_calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&expired_calls);
    let api = ApiClient::with_parts(
        Some(urls),
        Rc::clone(&tokens) as Rc<dyn TokenStore>,
        Rc::new(move || counter.set(counter.get() + 1)),
    );
    Harness {
        api,
        tokens,
        expired_calls,
    }
}

fn user_json(username: &str) -> serde_json::Value {
    json!({
        "id": "0b7d7b0a-93d4-4a4e-9df6-6dc49a5f0c5c",
        "username": username,
        "email": format!("{}@example.com", username),
        "full_name": username,
        "avatar_url": null,
        "bio": null,
        "is_active": true,
        "created_at": "2025-06-01T12:00:00Z",
        "updated_at": "2025-06-01T12:00:00Z",
        "roles": []
    })
}

#[tokio::test]
async fn requests_carry_the_bearer_token() {
    let server = MockServer::start_async().await;
    let threads = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/threads/")
                .query_param("page", "1")
                .query_param("size", "10")
                .header("authorization", "Bearer old");
            then.status(200)
                .json_body(json!({"total": 0, "page": 1, "size": 10, "items": []}));
        })
        .await;

    let h = harness(&server);
    let listing = h.api.get_threads(1, 10).await.unwrap();
    assert_eq!(listing.total, 0);
    assert_eq!(threads.hits_async().await, 1);
}

#[tokio::test]
async fn concurrent_401s_share_one_refresh() {
    let server = MockServer::start_async().await;
    let stale = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users/me")
                .header("authorization", "Bearer old");
            then.status(401).json_body(json!({"detail": "Token expired"}));
        })
        .await;
    let fresh = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users/me")
                .header("authorization", "Bearer new");
            then.status(200).json_body(user_json("alice"));
        })
        .await;
    // slow response keeps the refresh in flight while the other 401s land
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/refresh")
                .json_body(json!({"refresh_token": "r1"}));
            then.status(200)
                .delay(Duration::from_millis(200))
                .json_body(json!({
                    "access_token": "new",
                    "refresh_token": "r2",
                    "token_type": "bearer"
                }));
        })
        .await;

    let h = harness(&server);
    let results = join_all((0..3).map(|_| h.api.get_me())).await;
    for result in results {
        assert_eq!(result.unwrap().username, "alice");
    }

    assert_eq!(refresh.hits_async().await, 1);
    assert_eq!(stale.hits_async().await, 3);
    assert_eq!(fresh.hits_async().await, 3);
    assert_eq!(h.tokens.access_token().as_deref(), Some("new"));
    assert_eq!(h.tokens.refresh_token().as_deref(), Some("r2"));
    assert_eq!(h.expired_calls.get(), 0);
}

#[tokio::test]
async fn failed_refresh_expires_the_session_once() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/me");
            then.status(401).json_body(json!({"detail": "Token expired"}));
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/refresh");
            then.status(401)
                .delay(Duration::from_millis(200))
                .json_body(json!({"detail": "Invalid refresh token"}));
        })
        .await;

    let h = harness(&server);
    let results = join_all((0..3).map(|_| h.api.get_me())).await;
    for result in results {
        assert!(result.unwrap_err().is_session_expired());
    }

    assert_eq!(refresh.hits_async().await, 1);
    assert_eq!(h.expired_calls.get(), 1);
    assert!(h.tokens.access_token().is_none());
    assert!(h.tokens.refresh_token().is_none());
}

#[tokio::test]
async fn a_rejected_login_never_refreshes() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(401)
                .json_body(json!({"detail": "Incorrect email or password"}));
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/refresh");
            then.status(200).json_body(json!({"access_token": "new"}));
        })
        .await;

    let h = harness(&server);
    let err = h
        .api
        .login(&LoginRequest {
            email: "alice@example.com".to_string(),
            password: "nope".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Status {
            status: 401,
            message: "Incorrect email or password".to_string()
        }
    );
    assert_eq!(login.hits_async().await, 1);
    assert_eq!(refresh.hits_async().await, 0);
}

#[tokio::test]
async fn a_request_is_retried_at_most_once() {
    let server = MockServer::start_async().await;
    // rejects the fresh token too
    let me = server
        .mock_async(|when, then| {
            when.method(GET).path("/users/me");
            then.status(401).json_body(json!({"detail": "Token expired"}));
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/refresh");
            then.status(200).json_body(json!({
                "access_token": "new",
                "refresh_token": "r2"
            }));
        })
        .await;

    let h = harness(&server);
    let err = h.api.get_me().await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(me.hits_async().await, 2);
    assert_eq!(refresh.hits_async().await, 1);
}

#[tokio::test]
async fn refresh_keeps_the_old_refresh_token_without_rotation() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users/me")
                .header("authorization", "Bearer old");
            then.status(401).json_body(json!({"detail": "Token expired"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users/me")
                .header("authorization", "Bearer new");
            then.status(200).json_body(user_json("alice"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/refresh");
            then.status(200).json_body(json!({"access_token": "new"}));
        })
        .await;

    let h = harness(&server);
    h.api.get_me().await.unwrap();

    assert_eq!(h.tokens.access_token().as_deref(), Some("new"));
    assert_eq!(h.tokens.refresh_token().as_deref(), Some("r1"));
}

#[tokio::test]
async fn validation_errors_surface_their_first_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(422).json_body(json!({
                "detail": [{"msg": "field required", "loc": ["body", "email"]}]
            }));
        })
        .await;

    let h = harness(&server);
    let err = h
        .api
        .login(&LoginRequest {
            email: String::new(),
            password: String::new(),
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Status {
            status: 422,
            message: "field required (body.email)".to_string()
        }
    );
}

#[tokio::test]
async fn empty_success_bodies_decode_into_json_null() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PATCH).path("/notifications/read-all");
            then.status(204);
        })
        .await;

    let h = harness(&server);
    let value = h.api.mark_all_read().await.unwrap();
    assert!(value.is_null());
}
