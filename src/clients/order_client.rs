use crate::broadcast::BroadcastHandle;
use crate::model::{Order, OrderDraft, OrderId, StatusChangeEvent};
use crate::order_actor::{OrderAction, OrderError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

/// The order lifecycle engine.
///
/// Wraps the store client and turns store replies into the domain error
/// taxonomy. State checks run inside the owning shard (see
/// [`crate::order_actor::entity`]); this layer adds argument checks and
/// publishes a [`StatusChangeEvent`] for every successful transition.
///
/// The event is published after the shard has answered, so no delivery work
/// ever runs while the order is being mutated, and before the method returns.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    events: BroadcastHandle,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, events: BroadcastHandle) -> Self {
        Self { inner, events }
    }

    /// Stores a new order in state `New` and returns its id.
    #[instrument(skip(self, draft))]
    pub async fn create_order(&self, draft: Option<OrderDraft>) -> Result<OrderId, OrderError> {
        let draft = draft.ok_or_else(|| OrderError::InvalidArgument("order is required".into()))?;
        debug!(?draft, "create_order called");
        // Checked here as well so a rejected draft does not consume an id.
        draft.validate()?;

        let id = self.inner.create(draft).await.map_err(Self::map_error)?;
        info!(%id, "Order created");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, OrderError> {
        if !id.is_assignable() {
            return Err(OrderError::NotFound(id.to_string()));
        }
        self.get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    /// Every stored order, sorted by id.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.list().await?;
        orders.sort_by_key(|order| order.id);
        Ok(orders)
    }

    /// Replaces the editable fields of a `New` order and returns the stored result.
    #[instrument(skip(self, order))]
    pub async fn update_order(&self, order: Option<Order>) -> Result<Order, OrderError> {
        let order = order.ok_or_else(|| OrderError::InvalidArgument("order is required".into()))?;
        let id = order.id;
        debug!(%id, ?order, "update_order called");
        if !id.is_assignable() {
            return Err(OrderError::NotFound(id.to_string()));
        }

        self.inner
            .update(id, OrderDraft::from(order))
            .await
            .map_err(Self::map_error)
    }

    /// Removes a `New` or `InWork` order. Resolves to the number removed, always 1.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<usize, OrderError> {
        if !id.is_assignable() {
            return Err(OrderError::NotFound(id.to_string()));
        }
        match self.inner.delete(id).await.map_err(Self::map_error)? {
            0 => Err(OrderError::NotFound(id.to_string())),
            removed => {
                info!(%id, "Order deleted");
                Ok(removed)
            }
        }
    }

    /// `New -> InWork`.
    pub async fn process_order(&self, id: OrderId) -> Result<(), OrderError> {
        self.transition(id, OrderAction::Process).await
    }

    /// `InWork -> Closed`.
    pub async fn close_order(&self, id: OrderId) -> Result<(), OrderError> {
        self.transition(id, OrderAction::Close).await
    }

    #[instrument(skip(self))]
    async fn transition(&self, id: OrderId, action: OrderAction) -> Result<(), OrderError> {
        if !id.is_assignable() {
            return Err(OrderError::NotFound(id.to_string()));
        }

        let state = self
            .inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)?;
        info!(%id, %state, "Order transitioned");

        if !self.events.publish(StatusChangeEvent::new(id, state)) {
            warn!(%id, "Broadcaster stopped, status change not published");
        }
        Ok(())
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> OrderError {
        match e.into_entity_error::<OrderError>() {
            Ok(domain) => domain,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(FrameworkError::IdsExhausted) => OrderError::IdsExhausted,
            Err(other) => OrderError::StoreUnavailable(other.to_string()),
        }
    }
}
