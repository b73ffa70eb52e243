//! # Notification Broadcaster
//!
//! Fan-out of [`StatusChangeEvent`]s to every registered subscriber.
//!
//! The order engine only [`publish`](BroadcastHandle::publish)es: the event is
//! queued on an unbounded channel and the engine returns immediately. A single
//! [`Broadcaster`] task drains the queue and, for each event, delivers to a
//! snapshot of the registry with one task per subscriber.
//!
//! ## Eviction policy
//!
//! - [`DeliveryError::Disconnected`] evicts the subscriber at once.
//! - Any other failure (full queue, timeout, sink error) increments the
//!   subscriber's consecutive-failure count; reaching
//!   [`BroadcastConfig::max_delivery_failures`] evicts it.
//! - A successful delivery resets the count.
//!
//! A sink that panics is treated like one that returned
//! [`DeliveryError::Failed`].
//!
//! Eviction is equivalent to an unsubscribe: the subscriber's token is
//! cancelled and it receives nothing further.
//!
//! ## Latency bound
//!
//! Events are broadcast one at a time, in publish order. Each broadcast ends
//! when the slowest subscriber answers or hits `delivery_timeout`, so a
//! subscriber that keeps timing out delays every other subscriber's next event
//! by up to `delivery_timeout`, and the queue grows while it does. Such a
//! subscriber is evicted after `max_delivery_failures` consecutive timeouts;
//! one that succeeds in between keeps resetting its count and keeps costing
//! the full timeout. Keep `delivery_timeout` well below the expected interval
//! between transitions.

use crate::model::StatusChangeEvent;
use crate::subscription::{DeliveryError, Subscriber, SubscriptionRegistry};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastConfig {
    /// Upper bound for a single delivery to a single subscriber.
    pub delivery_timeout: Duration,
    /// Consecutive non-fatal failures after which a subscriber is evicted.
    pub max_delivery_failures: u32,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            delivery_timeout: Duration::from_millis(1000),
            max_delivery_failures: 3,
        }
    }
}

/// Publishing side held by the order engine.
#[derive(Clone, Debug)]
pub struct BroadcastHandle {
    sender: mpsc::UnboundedSender<StatusChangeEvent>,
}

impl BroadcastHandle {
    pub fn new(sender: mpsc::UnboundedSender<StatusChangeEvent>) -> Self {
        Self { sender }
    }

    /// Queues the event for delivery. Never waits.
    ///
    /// Returns `false` once the broadcaster has stopped.
    pub fn publish(&self, event: StatusChangeEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Outcome of one broadcast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
    pub evicted: usize,
    /// Subscribers that left the registry before or during delivery.
    pub skipped: usize,
}

pub struct Broadcaster {
    registry: Arc<SubscriptionRegistry>,
    config: BroadcastConfig,
    receiver: mpsc::UnboundedReceiver<StatusChangeEvent>,
}

impl Broadcaster {
    pub fn new(registry: Arc<SubscriptionRegistry>, config: BroadcastConfig) -> (Self, BroadcastHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let broadcaster = Self {
            registry,
            config,
            receiver,
        };
        (broadcaster, BroadcastHandle::new(sender))
    }

    /// Delivers queued events until every [`BroadcastHandle`] is dropped.
    pub async fn run(mut self) {
        info!("Broadcaster started");
        let mut events = 0usize;
        while let Some(event) = self.receiver.recv().await {
            events += 1;
            let report = broadcast(&self.registry, &self.config, event).await;
            debug!(
                order_id = %event.order_id,
                state = %event.state,
                delivered = report.delivered,
                failed = report.failed,
                evicted = report.evicted,
                "Broadcast"
            );
        }
        info!(events, "Broadcaster stopped");
    }
}

/// Delivers `event` to every current subscriber and applies the eviction policy.
///
/// Deliveries run concurrently, so one slow subscriber costs at most
/// `delivery_timeout` regardless of how many others there are.
pub async fn broadcast(
    registry: &SubscriptionRegistry,
    config: &BroadcastConfig,
    event: StatusChangeEvent,
) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    let mut deliveries = JoinSet::new();

    for subscriber in registry.snapshot() {
        if subscriber.token().is_cancelled() {
            report.skipped += 1;
            continue;
        }
        deliveries.spawn(deliver(subscriber, event, config.delivery_timeout));
    }

    while let Some(joined) = deliveries.join_next().await {
        let (subscriber, outcome) = match joined {
            Ok(done) => done,
            Err(e) => {
                warn!(error = %e, "Delivery task failed");
                report.failed += 1;
                continue;
            }
        };

        match outcome {
            None => report.skipped += 1,
            Some(Ok(())) => {
                subscriber.record_success();
                report.delivered += 1;
            }
            Some(Err(error)) => {
                report.failed += 1;
                let failures = subscriber.record_failure();
                warn!(
                    client_id = subscriber.client_id(),
                    order_id = %event.order_id,
                    failures,
                    %error,
                    "Delivery failed"
                );
                if (error.is_fatal() || failures >= config.max_delivery_failures)
                    && registry.evict(&subscriber)
                {
                    report.evicted += 1;
                }
            }
        }
    }

    report
}

/// `None` when the subscriber was cancelled before the sink answered.
async fn deliver(
    subscriber: Arc<Subscriber>,
    event: StatusChangeEvent,
    timeout: Duration,
) -> (Arc<Subscriber>, Option<Result<(), DeliveryError>>) {
    let outcome = tokio::select! {
        biased;
        _ = subscriber.token().cancelled() => None,
        result = tokio::time::timeout(timeout, guarded(&subscriber, event)) => {
            Some(result.unwrap_or(Err(DeliveryError::TimedOut(timeout))))
        }
    };
    (subscriber, outcome)
}

/// Runs the sink callback, turning a panic into [`DeliveryError::Failed`]
/// so the subscriber still goes through the eviction policy.
async fn guarded(subscriber: &Subscriber, event: StatusChangeEvent) -> Result<(), DeliveryError> {
    match AssertUnwindSafe(subscriber.sink().order_status_is_changed(event))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(panic) => {
            let message = if let Some(s) = panic.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            Err(DeliveryError::Failed(format!("sink panicked: {}", message)))
        }
    }
}
