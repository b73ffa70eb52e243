use crate::model::{OrderId, OrderState};
use serde::{Deserialize, Serialize};

/// Emitted once per successful state transition and pushed to every subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    pub order_id: OrderId,
    pub state: OrderState,
}

impl StatusChangeEvent {
    pub fn new(order_id: OrderId, state: OrderState) -> Self {
        Self { order_id, state }
    }
}
