use leptos::*;

use crate::api::{ApiClient, ApiError, UserRead};
use crate::config::roles;

/// Snapshot of the authenticated session.
#[derive(Clone, Default)]
pub struct SessionState {
    pub user: Option<UserRead>,
    pub is_authenticated: bool,
    /// True until the first hydration attempt settles; guards render
    /// decisions that depend on knowing whether a session exists.
    pub is_loading: bool,
}

/// Session state backed by the token store and the profile endpoint.
///
/// Tokens are the durable artifact; the profile is re-fetched from them on
/// every boot. A profile fetch failure after login rolls the stored
/// credentials back so the session is never half-established.
#[derive(Clone)]
pub struct SessionStore {
    state: RwSignal<SessionState>,
    api: ApiClient,
}

impl SessionStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            state: create_rw_signal(SessionState {
                user: None,
                is_authenticated: false,
                is_loading: true,
            }),
            api,
        }
    }

    pub fn api(&self) -> ApiClient {
        self.api.clone()
    }

    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    pub fn user(&self) -> Option<UserRead> {
        self.state.with(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(|s| s.is_authenticated)
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(|s| s.is_loading)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.state.with_untracked(|s| {
            s.user
                .as_ref()
                .map(|u| u.roles.iter().any(|r| r.name == role))
                .unwrap_or(false)
        })
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(roles::ADMIN)
    }

    pub fn is_moderator(&self) -> bool {
        self.has_role(roles::MODERATOR)
    }

    /// Persist freshly issued tokens, then load the profile they belong
    /// to. Rolls the tokens back if the profile fetch fails.
    pub async fn login(&self, access_token: &str, refresh_token: &str) -> Result<UserRead, ApiError> {
        self.api.tokens().set_tokens(access_token, refresh_token);
        match self.api.get_me().await {
            Ok(user) => {
                self.state.set(SessionState {
                    user: Some(user.clone()),
                    is_authenticated: true,
                    is_loading: false,
                });
                Ok(user)
            }
            Err(err) => {
                self.api.tokens().clear();
                self.state.set(SessionState {
                    user: None,
                    is_authenticated: false,
                    is_loading: false,
                });
                Err(err)
            }
        }
    }

    /// Rebuild the session from stored tokens on boot. With no access
    /// token this settles synchronously without touching the network.
    pub async fn hydrate(&self) {
        if self.api.tokens().access_token().is_none() {
            self.state.set(SessionState {
                user: None,
                is_authenticated: false,
                is_loading: false,
            });
            return;
        }
        match self.api.get_me().await {
            Ok(user) => self.state.set(SessionState {
                user: Some(user),
                is_authenticated: true,
                is_loading: false,
            }),
            Err(err) => {
                log::warn!("session hydration failed: {}", err);
                self.api.tokens().clear();
                self.state.set(SessionState {
                    user: None,
                    is_authenticated: false,
                    is_loading: false,
                });
            }
        }
    }

    /// Synchronous local sign-out.
    pub fn logout(&self) {
        self.api.tokens().clear();
        self.state.set(SessionState {
            user: None,
            is_authenticated: false,
            is_loading: false,
        });
    }

    /// Replace the cached profile after an in-place edit.
    pub fn set_user(&self, user: UserRead) {
        self.state.update(|s| {
            s.user = Some(user);
            s.is_authenticated = true;
            s.is_loading = false;
        });
    }
}

/// Install the session store into the reactive context and kick off
/// hydration.
pub fn provide_session(api: ApiClient) -> SessionStore {
    let store = SessionStore::new(api);
    provide_context(store.clone());
    let hydrating = store.clone();
    spawn_local(async move {
        hydrating.hydrate().await;
    });
    store
}

pub fn use_session() -> SessionStore {
    expect_context::<SessionStore>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{RoleRead, UserRead};
    use crate::config::ServiceUrls;
    use crate::utils::tokens::{MemoryTokenStore, TokenStore};
    use leptos::create_runtime;
    use std::rc::Rc;
    use uuid::Uuid;

    fn offline_store(tokens: Rc<MemoryTokenStore>) -> SessionStore {
        // port 1 is never bound; any request here is a bug
        let urls = ServiceUrls::new(
            "http://127.0.0.1:1",
            "http://127.0.0.1:1",
            "http://127.0.0.1:1",
            "ws://127.0.0.1:1",
        );
        let api = ApiClient::with_parts(Some(urls), tokens, Rc::new(|| {}));
        SessionStore::new(api)
    }

    fn member(name: &str, roles: &[&str]) -> UserRead {
        UserRead {
            id: Uuid::new_v4(),
            username: name.to_string(),
            email: format!("{}@example.com", name),
            full_name: name.to_string(),
            avatar_url: None,
            bio: None,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            roles: roles
                .iter()
                .map(|r| RoleRead {
                    id: Uuid::new_v4(),
                    name: r.to_string(),
                    description: None,
                })
                .collect(),
        }
    }

    #[test]
    fn starts_loading_and_unauthenticated() {
        let runtime = create_runtime();
        let store = offline_store(Rc::new(MemoryTokenStore::new()));
        assert!(store.is_loading());
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        runtime.dispose();
    }

    #[test]
    fn logout_clears_tokens_and_state() {
        let runtime = create_runtime();
        let tokens = Rc::new(MemoryTokenStore::with_tokens("a", "r"));
        let store = offline_store(Rc::clone(&tokens));
        store.set_user(member("alice", &["member"]));

        store.logout();
        assert!(tokens.access_token().is_none());
        assert!(tokens.refresh_token().is_none());
        assert!(!store.is_authenticated());
        assert!(!store.is_loading());
        runtime.dispose();
    }

    #[test]
    fn has_role_checks_the_cached_profile() {
        let runtime = create_runtime();
        let store = offline_store(Rc::new(MemoryTokenStore::new()));
        assert!(!store.has_role(roles::ADMIN));

        store.set_user(member("mod", &[roles::MEMBER, roles::MODERATOR]));
        assert!(store.has_role(roles::MODERATOR));
        assert!(!store.has_role(roles::ADMIN));
        runtime.dispose();
    }

    #[test]
    fn role_shortcuts_follow_the_profile() {
        let runtime = create_runtime();
        let store = offline_store(Rc::new(MemoryTokenStore::new()));
        assert!(!store.is_admin());
        assert!(!store.is_moderator());

        store.set_user(member("root", &[roles::MEMBER, roles::ADMIN]));
        assert!(store.is_admin());
        assert!(!store.is_moderator());
        runtime.dispose();
    }
}
