use std::cell::RefCell;

use web_sys::Storage;

const ACCESS_KEY: &str = "access_token";
const REFRESH_KEY: &str = "refresh_token";

/// Durable holder for the access/refresh credential pair.
///
/// No expiry is tracked here; an expired access token only shows up as a
/// rejected request, which the gateway recovers from.
pub trait TokenStore {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    fn set_tokens(&self, access_token: &str, refresh_token: &str);
    fn clear(&self);
}

/// Token store backed by browser localStorage under the two fixed key
/// names shared with earlier releases of the client.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTokenStore;

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

impl BrowserTokenStore {
    pub fn new() -> Self {
        Self
    }

    fn get(key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }
}

impl TokenStore for BrowserTokenStore {
    fn access_token(&self) -> Option<String> {
        Self::get(ACCESS_KEY)
    }

    fn refresh_token(&self) -> Option<String> {
        Self::get(REFRESH_KEY)
    }

    fn set_tokens(&self, access_token: &str, refresh_token: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(ACCESS_KEY, access_token);
            let _ = storage.set_item(REFRESH_KEY, refresh_token);
        }
    }

    fn clear(&self) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(ACCESS_KEY);
            let _ = storage.remove_item(REFRESH_KEY);
        }
    }
}

/// In-memory token store for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RefCell<Option<(String, String)>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access_token: &str, refresh_token: &str) -> Self {
        let store = Self::new();
        store.set_tokens(access_token, refresh_token);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.tokens.borrow().as_ref().map(|(a, _)| a.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.tokens.borrow().as_ref().map(|(_, r)| r.clone())
    }

    fn set_tokens(&self, access_token: &str, refresh_token: &str) {
        *self.tokens.borrow_mut() = Some((access_token.to_string(), refresh_token.to_string()));
    }

    fn clear(&self) {
        *self.tokens.borrow_mut() = None;
    }
}
