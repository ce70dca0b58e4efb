mod auth;
mod comments;
mod likes;
mod moderation;
mod notifications;
mod threads;

pub mod client;
pub mod error;
mod refresh;
pub mod types;

pub use client::*;
pub use error::*;
pub use types::*;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests;
