use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Runtime configuration as shipped next to the bundle (`config.json`) or
/// injected by the host page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub auth_url: Option<String>,
    pub discussion_url: Option<String>,
    pub notification_url: Option<String>,
    pub ws_url: Option<String>,
}

/// Resolved base URLs of the backend services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrls {
    pub auth: String,
    pub discussion: String,
    pub notification: String,
    pub ws: String,
}

impl ServiceUrls {
    pub fn new(
        auth: impl Into<String>,
        discussion: impl Into<String>,
        notification: impl Into<String>,
        ws: impl Into<String>,
    ) -> Self {
        Self {
            auth: normalize_base_url(&auth.into()),
            discussion: normalize_base_url(&discussion.into()),
            notification: normalize_base_url(&notification.into()),
            ws: normalize_base_url(&ws.into()),
        }
    }

    pub fn local_defaults() -> Self {
        Self::new(
            "http://localhost:8000",
            "http://localhost:8001",
            "http://localhost:8003",
            "ws://localhost:8002",
        )
    }

    fn from_runtime(cfg: &RuntimeConfig) -> Self {
        let defaults = Self::local_defaults();
        Self::new(
            cfg.auth_url.as_deref().unwrap_or(&defaults.auth),
            cfg.discussion_url.as_deref().unwrap_or(&defaults.discussion),
            cfg.notification_url
                .as_deref()
                .unwrap_or(&defaults.notification),
            cfg.ws_url.as_deref().unwrap_or(&defaults.ws),
        )
    }

    /// Per-thread live channel. The access token travels as a query
    /// parameter because the browser WebSocket API cannot set headers.
    pub fn ws_thread_url(&self, thread_id: &str, token: &str) -> String {
        format!(
            "{}/ws/threads/{}?token={}",
            self.ws,
            thread_id,
            encode_token(token)
        )
    }

    pub fn ws_feed_url(&self, token: &str) -> String {
        format!("{}/ws/feed?token={}", self.ws, encode_token(token))
    }

    pub fn ws_notifications_url(&self, token: &str) -> String {
        format!("{}/ws/notifications?token={}", self.ws, encode_token(token))
    }
}

/// Role names as issued by the auth service.
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const MODERATOR: &str = "moderator";
    pub const MEMBER: &str = "member";
}

static SERVICE_URLS: OnceLock<ServiceUrls> = OnceLock::new();

fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn encode_token(token: &str) -> String {
    utf8_percent_encode(token, NON_ALPHANUMERIC).to_string()
}

fn string_prop(obj: &js_sys::Object, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Ok(value) = js_sys::Reflect::get(obj, &(*key).into()) {
            if let Some(s) = value.as_string() {
                return Some(s);
            }
        }
    }
    None
}

fn global_object(name: &str) -> Option<js_sys::Object> {
    let window = web_sys::window()?;
    let any = js_sys::Reflect::get(&window, &name.into()).ok()?;
    if any.is_undefined() || any.is_null() {
        return None;
    }
    Some(js_sys::Object::from(any))
}

// Expect optional global objects:
//   window.__FORUM_ENV    = { AUTH_URL, DISCUSSION_URL, NOTIFICATION_URL, WS_URL }
//   window.__FORUM_CONFIG = { auth_url, discussion_url, notification_url, ws_url }
fn config_from_globals() -> Option<RuntimeConfig> {
    let obj = global_object("__FORUM_ENV").or_else(|| global_object("__FORUM_CONFIG"))?;
    let cfg = RuntimeConfig {
        auth_url: string_prop(&obj, &["AUTH_URL", "auth_url"]),
        discussion_url: string_prop(&obj, &["DISCUSSION_URL", "discussion_url"]),
        notification_url: string_prop(&obj, &["NOTIFICATION_URL", "notification_url"]),
        ws_url: string_prop(&obj, &["WS_URL", "ws_url"]),
    };
    if cfg.auth_url.is_none()
        && cfg.discussion_url.is_none()
        && cfg.notification_url.is_none()
        && cfg.ws_url.is_none()
    {
        return None;
    }
    Some(cfg)
}

async fn fetch_runtime_config() -> Option<RuntimeConfig> {
    let resp = reqwest::get("./config.json").await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    resp.json::<RuntimeConfig>().await.ok()
}

fn cache_urls(urls: ServiceUrls) -> ServiceUrls {
    let _ = SERVICE_URLS.set(urls.clone());
    urls
}

/// Resolve the service base URLs, fetching `config.json` on first use.
/// Globals injected by the host page take precedence over the fetch.
pub async fn await_service_urls() -> ServiceUrls {
    if let Some(cached) = SERVICE_URLS.get() {
        return cached.clone();
    }
    if let Some(cfg) = config_from_globals() {
        return cache_urls(ServiceUrls::from_runtime(&cfg));
    }
    if let Some(cfg) = fetch_runtime_config().await {
        return cache_urls(ServiceUrls::from_runtime(&cfg));
    }
    cache_urls(ServiceUrls::local_defaults())
}

pub async fn init() {
    let _ = await_service_urls().await;
}
