use std::rc::Rc;

use super::channel::LiveChannel;
use super::events::LiveEvent;
use super::{RuntimeSpawner, Spawn};
use crate::api::ApiClient;
use crate::cache::{ViewCache, ViewKey};
use crate::state::NotificationStore;
use crate::utils::effects::UiEffects;

/// Reconciler for the personal notification topic. Events only hint that
/// something changed; the unread badge is re-read from the server so the
/// count never drifts.
pub fn notification_event_handler(
    api: ApiClient,
    store: NotificationStore,
    cache: ViewCache,
    effects: Rc<dyn UiEffects>,
    spawner: Rc<dyn Spawn>,
) -> impl Fn(LiveEvent) {
    move |event| {
        cache.invalidate(&ViewKey::Notifications);
        cache.invalidate(&ViewKey::UnreadCount);

        if let Some(message) = event.display_message() {
            effects.toast(message);
        }

        let api = api.clone();
        spawner.spawn_local(Box::pin(async move {
            match api.get_unread_count().await {
                Ok(response) => store.set(response.unread_count),
                Err(err) => log::warn!("unread count refresh failed: {}", err),
            }
        }));
    }
}

/// Open the personal notification channel; idle without an access token.
pub async fn connect_notification_channel(
    api: &ApiClient,
    store: NotificationStore,
    cache: ViewCache,
    effects: Rc<dyn UiEffects>,
) -> LiveChannel {
    let urls = api.resolved_urls().await;
    let url = api
        .tokens()
        .access_token()
        .map(|token| urls.ws_notifications_url(&token));
    let handler = notification_event_handler(
        api.clone(),
        store,
        cache,
        effects,
        Rc::new(RuntimeSpawner),
    );
    LiveChannel::browser(url, handler)
}
