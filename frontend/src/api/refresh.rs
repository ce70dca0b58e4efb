use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{LocalBoxFuture, Shared};
use futures::FutureExt;
use reqwest::Client;
use serde_json::{json, Value};

use super::error::{error_message_from_body, ApiError};
use super::types::RefreshResponse;
use crate::utils::tokens::TokenStore;

type InFlight = Shared<LocalBoxFuture<'static, Result<String, ApiError>>>;

/// Single-flight credential refresh.
///
/// The first request that hits a 401 creates the in-flight future; every
/// request failing while it is outstanding attaches to the same future
/// instead of issuing its own refresh call. Failure clears the stored
/// credentials and invokes the session-expired handler once.
pub(crate) struct RefreshGate {
    http: Client,
    tokens: Rc<dyn TokenStore>,
    on_session_expired: Rc<dyn Fn()>,
    in_flight: Rc<RefCell<Option<InFlight>>>,
}

impl RefreshGate {
    pub fn new(http: Client, tokens: Rc<dyn TokenStore>, on_session_expired: Rc<dyn Fn()>) -> Self {
        Self {
            http,
            tokens,
            on_session_expired,
            in_flight: Rc::new(RefCell::new(None)),
        }
    }

    /// Join the in-flight refresh, or start one. Resolves to the new
    /// access token.
    pub async fn refresh(&self, auth_base: &str) -> Result<String, ApiError> {
        let fut = {
            let mut slot = self.in_flight.borrow_mut();
            match slot.as_ref() {
                Some(existing) => existing.clone(),
                None => {
                    let fut = Self::run(
                        self.http.clone(),
                        auth_base.to_string(),
                        Rc::clone(&self.tokens),
                        Rc::clone(&self.on_session_expired),
                        Rc::clone(&self.in_flight),
                    )
                    .boxed_local()
                    .shared();
                    *slot = Some(fut.clone());
                    fut
                }
            }
        };
        fut.await
    }

    async fn run(
        http: Client,
        auth_base: String,
        tokens: Rc<dyn TokenStore>,
        on_session_expired: Rc<dyn Fn()>,
        slot: Rc<RefCell<Option<InFlight>>>,
    ) -> Result<String, ApiError> {
        let result = Self::exchange(&http, &auth_base, tokens.as_ref()).await;
        // Clear the slot before waking waiters so a later 401 starts a
        // fresh cycle instead of observing a settled future.
        *slot.borrow_mut() = None;
        match result {
            Ok(access) => {
                log::debug!("access token refreshed");
                Ok(access)
            }
            Err(err) => {
                log::warn!("token refresh failed: {}", err);
                tokens.clear();
                (on_session_expired)();
                Err(err)
            }
        }
    }

    async fn exchange(
        http: &Client,
        auth_base: &str,
        tokens: &dyn TokenStore,
    ) -> Result<String, ApiError> {
        let refresh_token = tokens
            .refresh_token()
            .ok_or_else(|| ApiError::SessionExpired("No refresh token".to_string()))?;

        let response = http
            .post(format!("{}/auth/refresh", auth_base))
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| ApiError::SessionExpired(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(ApiError::SessionExpired(error_message_from_body(&body)));
        }

        let parsed: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ApiError::SessionExpired(format!("Failed to parse response: {}", e)))?;

        // The server may rotate the refresh token; keep the prior one when
        // it does not.
        let next_refresh = parsed.refresh_token.unwrap_or(refresh_token);
        tokens.set_tokens(&parsed.access_token, &next_refresh);
        Ok(parsed.access_token)
    }
}
