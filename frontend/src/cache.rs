use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use leptos::*;
use uuid::Uuid;

/// Cache keys for the server-derived views kept by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewKey {
    /// Global thread listing (home feed).
    Threads,
    /// A single thread summary.
    Thread(Uuid),
    /// Comment list of a thread.
    Comments(Uuid),
    /// The notification list.
    Notifications,
    /// The unread notification count.
    UnreadCount,
}

/// Invalidate-and-refetch view cache.
///
/// Each key owns a version signal; `invalidate` bumps it, and any view
/// keyed on the version refetches on its next read. Overlapping
/// invalidations of the same key collapse into a single refetch.
#[derive(Clone, Default)]
pub struct ViewCache {
    versions: Rc<RefCell<HashMap<ViewKey, RwSignal<u64>>>>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn signal(&self, key: &ViewKey) -> RwSignal<u64> {
        let mut versions = self.versions.borrow_mut();
        *versions
            .entry(key.clone())
            .or_insert_with(|| create_rw_signal(0))
    }

    pub fn invalidate(&self, key: &ViewKey) {
        log::debug!("invalidating view {:?}", key);
        self.signal(key).update(|v| *v += 1);
    }

    /// Reactive version read; views keyed on this refetch when it moves.
    pub fn version(&self, key: &ViewKey) -> u64 {
        self.signal(key).get()
    }
}
