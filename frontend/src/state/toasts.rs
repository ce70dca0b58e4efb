use std::cell::Cell;
use std::rc::Rc;

use leptos::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
}

/// Queue of transient user-visible messages. The UI layer renders and
/// dismisses them; everything else only pushes.
#[derive(Clone)]
pub struct ToastStore {
    toasts: RwSignal<Vec<Toast>>,
    next_id: Rc<Cell<u64>>,
}

impl ToastStore {
    pub fn new() -> Self {
        Self {
            toasts: create_rw_signal(Vec::new()),
            next_id: Rc::new(Cell::new(0)),
        }
    }

    pub fn push(&self, message: &str) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.toasts.update(|toasts| {
            toasts.push(Toast {
                id,
                message: message.to_string(),
            })
        });
        id
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.get()
    }
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new()
    }
}
