//! Outbound notification sinks.

use crate::model::StatusChangeEvent;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Why a notification could not be handed to a subscriber.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeliveryError {
    /// The subscriber's channel is gone for good.
    #[error("subscriber disconnected")]
    Disconnected,
    /// The subscriber is not draining its queue.
    #[error("subscriber queue is full")]
    QueueFull,
    #[error("delivery timed out after {0:?}")]
    TimedOut(Duration),
    #[error("delivery failed: {0}")]
    Failed(String),
}

impl DeliveryError {
    /// Fatal errors evict the subscriber on the first occurrence.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DeliveryError::Disconnected)
    }
}

/// The push half of a subscription: receives `OrderStatusIsChanged` callbacks.
///
/// Implementations must not block; the broadcaster bounds each call with the
/// configured delivery timeout.
#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    async fn order_status_is_changed(&self, event: StatusChangeEvent) -> Result<(), DeliveryError>;
}

/// Sink backed by a bounded in-process queue.
///
/// Delivery never waits: a full queue is reported as [`DeliveryError::QueueFull`]
/// and a dropped receiver as [`DeliveryError::Disconnected`].
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<StatusChangeEvent>,
}

impl ChannelSink {
    /// Creates a sink and the receiver the subscriber reads from.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<StatusChangeEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl NotificationSink for ChannelSink {
    async fn order_status_is_changed(&self, event: StatusChangeEvent) -> Result<(), DeliveryError> {
        self.sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::QueueFull,
            TrySendError::Closed(_) => DeliveryError::Disconnected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderId, OrderState};

    fn event(id: i32) -> StatusChangeEvent {
        StatusChangeEvent::new(OrderId(id), OrderState::InWork)
    }

    #[tokio::test]
    async fn channel_sink_reports_full_and_closed_queues() {
        let (sink, mut receiver) = ChannelSink::new(1);

        sink.order_status_is_changed(event(1)).await.unwrap();
        assert_eq!(
            sink.order_status_is_changed(event(2)).await,
            Err(DeliveryError::QueueFull)
        );
        assert_eq!(receiver.recv().await, Some(event(1)));

        drop(receiver);
        let err = sink.order_status_is_changed(event(3)).await.unwrap_err();
        assert_eq!(err, DeliveryError::Disconnected);
        assert!(err.is_fatal());
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let (sink, _receiver) = ChannelSink::new(0);
        assert_eq!(sink.sender.max_capacity(), 1);
    }
}
