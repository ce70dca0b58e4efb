use std::rc::Rc;

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::error::{error_message_from_body, ApiError};
use super::refresh::RefreshGate;
use crate::config::{self, ServiceUrls};
use crate::utils::tokens::{BrowserTokenStore, TokenStore};

/// Which backend service a request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Auth,
    Discussion,
    Notification,
}

/// Authenticated request gateway over the three forum services.
///
/// Every request carries the current access token; a 401 on anything but
/// the login/refresh endpoints funnels through the single-flight refresh
/// in [`RefreshGate`] and is retried exactly once.
#[derive(Clone)]
pub struct ApiClient {
    inner: Rc<Inner>,
}

struct Inner {
    http: Client,
    urls: Option<ServiceUrls>,
    tokens: Rc<dyn TokenStore>,
    refresh: RefreshGate,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::with_parts(None, Rc::new(BrowserTokenStore::new()), Rc::new(redirect_to_login))
    }

    pub fn new_with_urls(urls: ServiceUrls) -> Self {
        Self::with_parts(
            Some(urls),
            Rc::new(BrowserTokenStore::new()),
            Rc::new(redirect_to_login),
        )
    }

    /// Fully injected constructor: explicit URLs, token store and
    /// session-expired handler.
    pub fn with_parts(
        urls: Option<ServiceUrls>,
        tokens: Rc<dyn TokenStore>,
        on_session_expired: Rc<dyn Fn()>,
    ) -> Self {
        let http = Client::new();
        let refresh = RefreshGate::new(http.clone(), Rc::clone(&tokens), on_session_expired);
        Self {
            inner: Rc::new(Inner {
                http,
                urls,
                tokens,
                refresh,
            }),
        }
    }

    pub fn tokens(&self) -> Rc<dyn TokenStore> {
        Rc::clone(&self.inner.tokens)
    }

    pub(crate) async fn resolved_urls(&self) -> ServiceUrls {
        if let Some(urls) = &self.inner.urls {
            urls.clone()
        } else {
            config::await_service_urls().await
        }
    }

    fn service_base<'a>(urls: &'a ServiceUrls, service: Service) -> &'a str {
        match service {
            Service::Auth => &urls.auth,
            Service::Discussion => &urls.discussion,
            Service::Notification => &urls.notification,
        }
    }

    // ---- request plumbing ----

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.fetch(service, Method::GET, path, query, None::<&Value>)
            .await
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.fetch(service, Method::POST, path, &[], Some(body)).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.fetch(service, Method::POST, path, query, None::<&Value>)
            .await
    }

    pub(crate) async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.fetch(service, Method::PATCH, path, &[], Some(body))
            .await
    }

    pub(crate) async fn patch_empty<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
    ) -> Result<T, ApiError> {
        self.fetch(service, Method::PATCH, path, &[], None::<&Value>)
            .await
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
    ) -> Result<T, ApiError> {
        self.fetch(service, Method::DELETE, path, &[], None::<&Value>)
            .await
    }

    async fn fetch<B: Serialize, T: DeserializeOwned>(
        &self,
        service: Service,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        let response = self
            .dispatch(service, method, path, query, body.as_ref())
            .await?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("{}", e)))?;

        if status.is_success() {
            if text.trim().is_empty() {
                serde_json::from_value(Value::Null).map_err(|e| ApiError::Decode(e.to_string()))
            } else {
                serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
            }
        } else {
            let parsed: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
            Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message_from_body(&parsed),
            })
        }
    }

    async fn dispatch(
        &self,
        service: Service,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Response, ApiError> {
        let urls = self.resolved_urls().await;
        let url = format!("{}{}", Self::service_base(&urls, service), path);

        let first = self
            .send_once(&method, &url, query, body, self.inner.tokens.access_token())
            .await?;

        if first.status() != StatusCode::UNAUTHORIZED || refresh_exempt(path) {
            return Ok(first);
        }

        // Join (or start) the single refresh, then retry exactly once with
        // the post-refresh credential. A second 401 propagates as-is.
        let access = self.inner.refresh.refresh(&urls.auth).await?;
        self.send_once(&method, &url, query, body, Some(access)).await
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        token: Option<String>,
    ) -> Result<Response, ApiError> {
        let mut request = self.inner.http.request(method.clone(), url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Request failed: {}", e)))
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// The login and refresh endpoints must never trigger a refresh cycle of
/// their own.
fn refresh_exempt(path: &str) -> bool {
    path.contains("/auth/refresh") || path.contains("/auth/login")
}

pub(crate) fn redirect_to_login() {
    if let Some(window) = web_sys::window() {
        let location = window.location();
        if let Ok(pathname) = location.pathname() {
            if pathname == "/login" {
                return;
            }
        }
        let _ = location.set_href("/login");
    }
}
