use super::config::ServiceConfig;
use super::seed;
use crate::broadcast::Broadcaster;
use crate::clients::OrderClient;
use crate::model::OrderId;
use crate::order_actor::OrderError;
use crate::service::OrderService;
use crate::subscription::SubscriptionRegistry;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// The runtime orchestrator for the order service.
///
/// `OrderSystem` is responsible for:
/// - **Lifecycle Management**: starting the store shards and the broadcaster,
///   and stopping them again
/// - **Dependency Wiring**: handing the engine its store client and broadcast
///   handle, and the façade its engine and registry
///
/// # Architecture
///
/// - **Order store**: `store_shards` [`ResourceActor`](actor_framework::ResourceActor)
///   tasks, each owning a slice of the orders
/// - **Broadcaster**: one task delivering status changes to subscribers
/// - **Registry**: a shared concurrent map, no task of its own
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::start(ServiceConfig::from_env()?).await?;
///
/// let id = system.service.create_new_order(Some(draft)).await?;
/// system.service.process_order(id).await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    pub service: OrderService,
    pub registry: Arc<SubscriptionRegistry>,
    shutdown: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl OrderSystem {
    /// Spawns every actor. The store starts empty.
    pub fn new(config: ServiceConfig) -> Self {
        let registry = Arc::new(SubscriptionRegistry::new());
        let shutdown = CancellationToken::new();

        let (shards, store) = crate::order_actor::new(config.store_shards, config.channel_buffer);
        let (broadcaster, events) = Broadcaster::new(registry.clone(), config.broadcast());

        let mut handles: Vec<JoinHandle<()>> = shards
            .into_iter()
            .map(|shard| tokio::spawn(shard.run(())))
            .collect();
        handles.push(tokio::spawn(broadcaster.run()));

        let orders = OrderClient::new(store, events);
        let service = OrderService::new(
            orders,
            registry.clone(),
            shutdown.clone(),
            config.notification_capacity,
        );

        info!(
            shards = config.store_shards,
            buffer = config.channel_buffer,
            "Order system started"
        );

        Self {
            service,
            registry,
            shutdown,
            handles,
        }
    }

    /// Spawns every actor and seeds demo orders when the config asks for it.
    pub async fn start(config: ServiceConfig) -> Result<Self, OrderError> {
        let seed = config.seed_demo_orders;
        let system = Self::new(config);
        if seed {
            system.seed_demo_orders().await?;
        }
        Ok(system)
    }

    /// See [`seed::seed_demo_orders`].
    pub async fn seed_demo_orders(&self) -> Result<Vec<OrderId>, OrderError> {
        seed::seed_demo_orders(self.service.orders()).await
    }

    /// Gracefully shuts down the system.
    ///
    /// 1. Cancels long-running operations and every subscription.
    /// 2. Drops the façade, which closes the shard and broadcaster channels.
    /// 3. Waits for every actor task to drain its queue and exit. A task that
    ///    panicked does not stop the others from being awaited; the first
    ///    failure is returned once all have finished.
    ///
    /// Clones of the façade still held elsewhere keep their channels open, and
    /// this waits until they are dropped too.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down order system...");

        self.shutdown.cancel();
        self.registry.clear();
        drop(self.service);

        join_all(self.handles).await?;

        info!("Order system shutdown complete.");
        Ok(())
    }
}

async fn join_all(handles: Vec<JoinHandle<()>>) -> Result<(), JoinError> {
    let mut first_failure = None;
    for handle in handles {
        if let Err(e) = handle.await {
            error!(error = %e, "Actor task failed");
            first_failure.get_or_insert(e);
        }
    }
    match first_failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
