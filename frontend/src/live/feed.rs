use super::channel::LiveChannel;
use super::events::{EventKind, LiveEvent};
use crate::api::ApiClient;
use crate::cache::{ViewCache, ViewKey};

/// Reconciler for the global feed topic: any recognized change stales the
/// thread listing, and carries over to the affected thread's summary and
/// comment list whenever the event names one.
pub fn feed_event_handler(cache: ViewCache) -> impl Fn(LiveEvent) {
    move |event| {
        if event.kind() == EventKind::Other {
            return;
        }
        cache.invalidate(&ViewKey::Threads);

        if let Some(thread_id) = event.thread_id {
            cache.invalidate(&ViewKey::Thread(thread_id));
            cache.invalidate(&ViewKey::Comments(thread_id));
        }
    }
}

/// Open the global feed channel; idle without an access token.
pub async fn connect_feed_channel(api: &ApiClient, cache: ViewCache) -> LiveChannel {
    let urls = api.resolved_urls().await;
    let url = api
        .tokens()
        .access_token()
        .map(|token| urls.ws_feed_url(&token));
    LiveChannel::browser(url, feed_event_handler(cache))
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptos::create_runtime;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn thread_creation_stales_the_listing_and_the_new_thread() {
        let runtime = create_runtime();
        let cache = ViewCache::new();
        let handler = feed_event_handler(cache.clone());
        let thread_id = Uuid::new_v4();

        handler(
            serde_json::from_value(json!({
                "event": "thread.created",
                "thread_id": thread_id.to_string(),
            }))
            .unwrap(),
        );
        assert_eq!(cache.version(&ViewKey::Threads), 1);
        assert_eq!(cache.version(&ViewKey::Thread(thread_id)), 1);
        assert_eq!(cache.version(&ViewKey::Comments(thread_id)), 1);
        runtime.dispose();
    }

    #[test]
    fn like_events_cascade_to_the_named_thread() {
        let runtime = create_runtime();
        let cache = ViewCache::new();
        let handler = feed_event_handler(cache.clone());
        let thread_id = Uuid::new_v4();

        handler(
            serde_json::from_value(json!({
                "event": "thread.like.updated",
                "thread_id": thread_id.to_string(),
            }))
            .unwrap(),
        );
        assert_eq!(cache.version(&ViewKey::Threads), 1);
        assert_eq!(cache.version(&ViewKey::Thread(thread_id)), 1);
        assert_eq!(cache.version(&ViewKey::Comments(thread_id)), 1);
        runtime.dispose();
    }

    #[test]
    fn comment_events_cascade_to_the_named_thread() {
        let runtime = create_runtime();
        let cache = ViewCache::new();
        let handler = feed_event_handler(cache.clone());
        let thread_id = Uuid::new_v4();

        handler(
            serde_json::from_value(json!({
                "event": "comment.created",
                "thread_id": thread_id.to_string(),
            }))
            .unwrap(),
        );
        assert_eq!(cache.version(&ViewKey::Threads), 1);
        assert_eq!(cache.version(&ViewKey::Thread(thread_id)), 1);
        assert_eq!(cache.version(&ViewKey::Comments(thread_id)), 1);
        runtime.dispose();
    }

    #[test]
    fn events_without_a_thread_id_still_stale_the_listing() {
        let runtime = create_runtime();
        let cache = ViewCache::new();
        let handler = feed_event_handler(cache.clone());

        handler(serde_json::from_value(json!({"event": "thread.updated"})).unwrap());
        assert_eq!(cache.version(&ViewKey::Threads), 1);
        runtime.dispose();
    }

    #[test]
    fn unrecognized_events_are_ignored() {
        let runtime = create_runtime();
        let cache = ViewCache::new();
        let handler = feed_event_handler(cache.clone());

        handler(serde_json::from_value(json!({"event": "presence.ping"})).unwrap());
        assert_eq!(cache.version(&ViewKey::Threads), 0);
        runtime.dispose();
    }
}
