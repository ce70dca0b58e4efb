pub mod api;
pub mod cache;
pub mod config;
pub mod live;
pub mod state;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use cache::{ViewCache, ViewKey};
pub use state::{provide_session, use_session, SessionStore};

/// One-time process setup: panic messages and log lines go to the
/// browser console.
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}
