use std::rc::Rc;

use uuid::Uuid;

use super::channel::LiveChannel;
use super::events::{EventKind, LiveEvent};
use crate::api::ApiClient;
use crate::cache::{ViewCache, ViewKey};
use crate::utils::effects::UiEffects;

/// Reconciler for the per-thread topic: map each event to the views it
/// stales. Deletion of the thread being viewed kicks the reader home.
pub fn thread_event_handler(
    thread_id: Uuid,
    cache: ViewCache,
    effects: Rc<dyn UiEffects>,
) -> impl Fn(LiveEvent) {
    move |event| match event.kind() {
        EventKind::CommentCreated | EventKind::CommentUpdated | EventKind::CommentDeleted => {
            cache.invalidate(&ViewKey::Comments(thread_id));
            cache.invalidate(&ViewKey::Thread(thread_id));
        }
        EventKind::ThreadUpdated => {
            cache.invalidate(&ViewKey::Thread(thread_id));
        }
        EventKind::ThreadDeleted => {
            effects.toast("This thread was deleted");
            effects.navigate("/");
        }
        EventKind::ThreadLikeUpdated | EventKind::CommentLikeUpdated => {
            cache.invalidate(&ViewKey::Thread(thread_id));
            cache.invalidate(&ViewKey::Comments(thread_id));
        }
        EventKind::ThreadCreated | EventKind::Other => {}
    }
}

/// Open the per-thread channel. Without an access token the channel stays
/// idle rather than connecting anonymously.
pub async fn connect_thread_channel(
    api: &ApiClient,
    thread_id: Uuid,
    cache: ViewCache,
    effects: Rc<dyn UiEffects>,
) -> LiveChannel {
    let urls = api.resolved_urls().await;
    let url = api
        .tokens()
        .access_token()
        .map(|token| urls.ws_thread_url(&thread_id.to_string(), &token));
    LiveChannel::browser(url, thread_event_handler(thread_id, cache, effects))
}
