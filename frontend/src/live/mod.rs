pub mod channel;
pub mod events;
pub mod feed;
pub mod notifications;
pub mod thread;

#[cfg(test)]
pub mod test_support;

use futures::future::LocalBoxFuture;

/// Seam for spawning fire-and-forget local futures, so event handlers
/// that call the API stay testable off the browser.
pub trait Spawn {
    fn spawn_local(&self, fut: LocalBoxFuture<'static, ()>);
}

/// Spawns onto the reactive runtime's local executor.
#[derive(Clone, Copy, Default)]
pub struct RuntimeSpawner;

impl Spawn for RuntimeSpawner {
    fn spawn_local(&self, fut: LocalBoxFuture<'static, ()>) {
        leptos::spawn_local(fut);
    }
}
