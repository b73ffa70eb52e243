//! [`ActorEntity`] implementation for [`Order`].
//!
//! The store shard calls these hooks while it holds the only copy of the
//! record, and commits the result only when the hook returns `Ok`. That makes
//! the state checks below race-free: two concurrent `Process` requests for the
//! same order are serialized by its shard, and exactly one of them wins.

use super::actions::OrderAction;
use super::error::OrderError;
use crate::model::{Order, OrderDraft, OrderId, OrderState};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderDraft;
    type Update = OrderDraft;
    type Action = OrderAction;
    type ActionResult = OrderState;
    type Context = ();
    type Error = OrderError;

    /// New orders always start in `New`, whatever the caller sent.
    fn from_create_params(id: OrderId, draft: OrderDraft) -> Result<Self, OrderError> {
        draft.validate()?;
        Ok(Order::new(id, draft))
    }

    /// Field edits are only allowed while the order is `New`.
    async fn on_update(&mut self, draft: OrderDraft, _ctx: &()) -> Result<(), OrderError> {
        self.require(OrderState::New, "update")?;
        draft.validate()?;
        self.apply(draft);
        Ok(())
    }

    /// Closed orders are immutable and cannot be removed.
    async fn on_delete(&self, _ctx: &()) -> Result<(), OrderError> {
        if self.state == OrderState::Closed {
            return Err(self.invalid_state("delete"));
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: OrderAction, _ctx: &()) -> Result<OrderState, OrderError> {
        match action {
            OrderAction::Process => {
                self.require(OrderState::New, action.name())?;
                self.state = OrderState::InWork;
                self.order_date = Some(Utc::now());
            }
            OrderAction::Close => {
                self.require(OrderState::InWork, action.name())?;
                self.state = OrderState::Closed;
                self.shipped_date = Some(Utc::now());
            }
        }
        Ok(self.state)
    }
}

impl Order {
    fn require(&self, state: OrderState, operation: &'static str) -> Result<(), OrderError> {
        if self.state != state {
            return Err(self.invalid_state(operation));
        }
        Ok(())
    }

    fn invalid_state(&self, operation: &'static str) -> OrderError {
        OrderError::InvalidState {
            id: self.id,
            state: self.state,
            operation,
        }
    }
}
