use leptos::*;

/// Unread-notification badge count, shared across the header and the
/// notifications page.
#[derive(Clone, Copy)]
pub struct NotificationStore {
    unread: RwSignal<u64>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self {
            unread: create_rw_signal(0),
        }
    }

    /// Replace the count with the server's authoritative value.
    pub fn set(&self, count: u64) {
        self.unread.set(count);
    }

    pub fn decrement(&self, by: u64) {
        self.unread.update(|n| *n = n.saturating_sub(by));
    }

    pub fn reset(&self) {
        self.unread.set(0);
    }

    pub fn unread(&self) -> u64 {
        self.unread.get()
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}
