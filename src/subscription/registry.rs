use super::sink::NotificationSink;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One registered client.
///
/// The token is cancelled when the subscriber leaves the registry for any
/// reason, which aborts deliveries still in flight to it.
pub struct Subscriber {
    client_id: String,
    sink: Arc<dyn NotificationSink>,
    token: CancellationToken,
    failures: AtomicU32,
}

impl Subscriber {
    fn new(client_id: String, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            client_id,
            sink,
            token: CancellationToken::new(),
            failures: AtomicU32::new(0),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn sink(&self) -> &dyn NotificationSink {
        self.sink.as_ref()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Consecutive failed deliveries since the last success.
    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Records a failed delivery and returns the new consecutive count.
    pub fn record_failure(&self) -> u32 {
        self.failures.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_success(&self) {
        self.failures.store(0, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("client_id", &self.client_id)
            .field("failures", &self.failures())
            .finish_non_exhaustive()
    }
}

/// Concurrent map of client id to subscriber.
///
/// Every mutation touches a single entry, so concurrent subscribes and
/// unsubscribes for different clients do not contend, and a snapshot can be
/// taken while they happen.
#[derive(Default)]
pub struct SubscriptionRegistry {
    subscribers: DashMap<String, Arc<Subscriber>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `sink` to `client_id`. Subscribing again rebinds to the new sink
    /// and cancels the old subscriber.
    ///
    /// Returns `false` only for a blank client id.
    pub fn subscribe(&self, client_id: &str, sink: Arc<dyn NotificationSink>) -> bool {
        if client_id.trim().is_empty() {
            warn!("Rejected subscription with empty client id");
            return false;
        }

        let subscriber = Arc::new(Subscriber::new(client_id.to_string(), sink));
        match self.subscribers.insert(client_id.to_string(), subscriber) {
            Some(previous) => {
                previous.token.cancel();
                info!(client_id, "Subscription rebound");
            }
            None => info!(client_id, subscribers = self.subscribers.len(), "Subscribed"),
        }
        true
    }

    /// Removes the subscriber. `false` if it was not registered.
    pub fn unsubscribe(&self, client_id: &str) -> bool {
        match self.subscribers.remove(client_id) {
            Some((_, subscriber)) => {
                subscriber.token.cancel();
                info!(client_id, "Unsubscribed");
                true
            }
            None => {
                debug!(client_id, "Unsubscribe for unknown client");
                false
            }
        }
    }

    /// Called by a transport when the client's connection dropped.
    pub fn disconnect(&self, client_id: &str) -> bool {
        match self.subscribers.remove(client_id) {
            Some((_, subscriber)) => {
                subscriber.token.cancel();
                warn!(client_id, "Subscriber disconnected");
                true
            }
            None => false,
        }
    }

    /// Removes `subscriber` if it is still the one bound to its client id.
    ///
    /// A client that re-subscribed in the meantime keeps its new binding.
    pub fn evict(&self, subscriber: &Arc<Subscriber>) -> bool {
        let removed = self
            .subscribers
            .remove_if(&subscriber.client_id, |_, current| Arc::ptr_eq(current, subscriber))
            .is_some();
        if removed {
            subscriber.token.cancel();
            warn!(
                client_id = %subscriber.client_id,
                failures = subscriber.failures(),
                "Subscriber evicted"
            );
        }
        removed
    }

    /// Current subscribers. No lock is held once this returns.
    pub fn snapshot(&self) -> Vec<Arc<Subscriber>> {
        self.subscribers
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn contains(&self, client_id: &str) -> bool {
        self.subscribers.contains_key(client_id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Drops every subscriber, cancelling each.
    pub fn clear(&self) {
        self.subscribers.retain(|_, subscriber| {
            subscriber.token.cancel();
            false
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::ChannelSink;

    fn sink() -> Arc<dyn NotificationSink> {
        Arc::new(ChannelSink::new(4).0)
    }

    #[test]
    fn subscribe_is_an_upsert() {
        let registry = SubscriptionRegistry::new();
        assert!(registry.subscribe("a", sink()));
        let first = registry.snapshot().pop().unwrap();

        assert!(registry.subscribe("a", sink()));
        assert_eq!(registry.len(), 1);
        assert!(first.token().is_cancelled());

        let current = registry.snapshot().pop().unwrap();
        assert!(!Arc::ptr_eq(&first, &current));
        assert!(!current.token().is_cancelled());
    }

    #[test]
    fn blank_client_id_is_rejected() {
        let registry = SubscriptionRegistry::new();
        assert!(!registry.subscribe("", sink()));
        assert!(!registry.subscribe("   ", sink()));
        assert!(registry.is_empty());
    }

    #[test]
    fn unsubscribe_twice_returns_false() {
        let registry = SubscriptionRegistry::new();
        registry.subscribe("a", sink());
        let subscriber = registry.snapshot().pop().unwrap();

        assert!(registry.unsubscribe("a"));
        assert!(subscriber.token().is_cancelled());
        assert!(!registry.unsubscribe("a"));
        assert!(!registry.disconnect("a"));
    }

    #[test]
    fn stale_eviction_keeps_rebound_subscriber() {
        let registry = SubscriptionRegistry::new();
        registry.subscribe("a", sink());
        let stale = registry.snapshot().pop().unwrap();
        registry.subscribe("a", sink());

        assert!(!registry.evict(&stale));
        assert!(registry.contains("a"));

        let current = registry.snapshot().pop().unwrap();
        assert!(registry.evict(&current));
        assert!(!registry.contains("a"));
    }

    #[test]
    fn failure_counter_resets_on_success() {
        let registry = SubscriptionRegistry::new();
        registry.subscribe("a", sink());
        let subscriber = registry.snapshot().pop().unwrap();

        assert_eq!(subscriber.record_failure(), 1);
        assert_eq!(subscriber.record_failure(), 2);
        subscriber.record_success();
        assert_eq!(subscriber.failures(), 0);
    }

    #[test]
    fn clear_cancels_everyone() {
        let registry = SubscriptionRegistry::new();
        registry.subscribe("a", sink());
        registry.subscribe("b", sink());
        let subscribers = registry.snapshot();

        registry.clear();
        assert!(registry.is_empty());
        assert!(subscribers.iter().all(|s| s.token().is_cancelled()));
    }
}
