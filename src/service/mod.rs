//! # Service Façade
//!
//! [`OrderService`] is the request-handling surface a transport calls into.
//! Each method is one client-facing operation. The façade is cheap to clone;
//! a transport hands one clone to every in-flight request.

use crate::clients::OrderClient;
use crate::model::{Order, OrderDraft, OrderId, StatusChangeEvent};
use crate::order_actor::OrderError;
use crate::subscription::{ChannelSink, NotificationSink, SubscriptionRegistry};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct OrderService {
    orders: OrderClient,
    registry: Arc<SubscriptionRegistry>,
    shutdown: CancellationToken,
    notification_capacity: usize,
}

impl OrderService {
    /// `shutdown` interrupts long-running operations when the system stops.
    pub fn new(
        orders: OrderClient,
        registry: Arc<SubscriptionRegistry>,
        shutdown: CancellationToken,
        notification_capacity: usize,
    ) -> Self {
        Self {
            orders,
            registry,
            shutdown,
            notification_capacity,
        }
    }

    /// The lifecycle engine behind this façade.
    pub fn orders(&self) -> &OrderClient {
        &self.orders
    }

    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Order>, OrderError> {
        self.orders.all_orders().await
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: OrderId) -> Result<Order, OrderError> {
        self.orders.get_order(id).await
    }

    #[instrument(skip(self, order))]
    pub async fn create_new_order(&self, order: Option<OrderDraft>) -> Result<OrderId, OrderError> {
        self.orders.create_order(order).await
    }

    #[instrument(skip(self, order))]
    pub async fn update_order(&self, order: Option<Order>) -> Result<(), OrderError> {
        self.orders.update_order(order).await.map(|_| ())
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<usize, OrderError> {
        self.orders.delete_order(id).await
    }

    #[instrument(skip(self))]
    pub async fn process_order(&self, id: OrderId) -> Result<(), OrderError> {
        self.orders.process_order(id).await
    }

    #[instrument(skip(self))]
    pub async fn close_order(&self, id: OrderId) -> Result<(), OrderError> {
        self.orders.close_order(id).await
    }

    /// Registers `sink` for status-change callbacks under `client_id`.
    #[instrument(skip(self, sink))]
    pub fn subscribe(&self, client_id: &str, sink: Arc<dyn NotificationSink>) -> bool {
        self.registry.subscribe(client_id, sink)
    }

    /// Subscribes with an in-process queue of the configured capacity.
    ///
    /// `None` if the client id was rejected.
    #[instrument(skip(self))]
    pub fn subscribe_channel(&self, client_id: &str) -> Option<mpsc::Receiver<StatusChangeEvent>> {
        let (sink, receiver) = ChannelSink::new(self.notification_capacity);
        self.registry
            .subscribe(client_id, Arc::new(sink))
            .then_some(receiver)
    }

    #[instrument(skip(self))]
    pub fn unsubscribe(&self, client_id: &str) -> bool {
        self.registry.unsubscribe(client_id)
    }

    /// For transports: the client behind `client_id` went away.
    #[instrument(skip(self))]
    pub fn disconnect(&self, client_id: &str) -> bool {
        self.registry.disconnect(client_id)
    }

    /// Suspends the calling request for at least `seconds`.
    ///
    /// Only the caller's task waits; no store shard or registry entry is held.
    /// Returns [`OrderError::Cancelled`] if the system shuts down first.
    pub async fn simulate_long_running_operation(&self, seconds: u8) -> Result<(), OrderError> {
        self.simulate_long_running_operation_with(seconds, &CancellationToken::new())
            .await
    }

    /// Like [`simulate_long_running_operation`](Self::simulate_long_running_operation),
    /// but also stops when `cancel` fires, e.g. because the caller disconnected.
    #[instrument(skip(self, cancel))]
    pub async fn simulate_long_running_operation_with(
        &self,
        seconds: u8,
        cancel: &CancellationToken,
    ) -> Result<(), OrderError> {
        let duration = Duration::from_secs(u64::from(seconds));
        debug!(?duration, "Long-running operation started");

        tokio::select! {
            _ = tokio::time::sleep(duration) => {
                info!(seconds, "Long-running operation finished");
                Ok(())
            }
            _ = self.shutdown.cancelled() => {
                info!(seconds, "Long-running operation interrupted by shutdown");
                Err(OrderError::Cancelled)
            }
            _ = cancel.cancelled() => {
                info!(seconds, "Long-running operation cancelled by caller");
                Err(OrderError::Cancelled)
            }
        }
    }
}
