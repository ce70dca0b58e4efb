use crate::state::toasts::ToastStore;

/// User-visible side effects raised by the synchronization core. Injected
/// so the reconcilers stay testable off-browser.
pub trait UiEffects {
    fn toast(&self, message: &str);
    fn navigate(&self, path: &str);
}

/// Browser implementation: toasts land in the shared [`ToastStore`] for the
/// UI layer to render, navigation goes through `window.location`.
#[derive(Clone)]
pub struct BrowserEffects {
    toasts: ToastStore,
}

impl BrowserEffects {
    pub fn new(toasts: ToastStore) -> Self {
        Self { toasts }
    }
}

impl UiEffects for BrowserEffects {
    fn toast(&self, message: &str) {
        log::info!("toast: {}", message);
        self.toasts.push(message);
    }

    fn navigate(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(path);
        }
    }
}
