pub mod auth;
pub mod notifications;
pub mod toasts;

pub use auth::{provide_session, use_session, SessionState, SessionStore};
pub use notifications::NotificationStore;
pub use toasts::{Toast, ToastStore};
