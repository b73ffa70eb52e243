//! Error types for the Order actor.

use crate::model::{OrderId, OrderState};
use thiserror::Error;

/// Errors returned by every order operation.
///
/// The first three are request faults caused by the caller. `IdsExhausted`
/// and `StoreUnavailable` are service faults; `Cancelled` is only produced by
/// the long-running operation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The order was absent or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No order with this id exists.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The operation is not legal in the order's current state.
    #[error("Cannot {operation} order {id} in state {state}")]
    InvalidState {
        id: OrderId,
        state: OrderState,
        operation: &'static str,
    },

    /// Every order id has been handed out; no further orders can be created.
    #[error("Order ids exhausted")]
    IdsExhausted,

    /// The store shard owning the order is gone or dropped the reply.
    #[error("Order store unavailable: {0}")]
    StoreUnavailable(String),

    /// The operation was interrupted before it finished.
    #[error("Operation cancelled")]
    Cancelled,
}

impl OrderError {
    /// `true` for faults caused by the request itself rather than the service.
    pub fn is_request_fault(&self) -> bool {
        matches!(
            self,
            OrderError::InvalidArgument(_) | OrderError::NotFound(_) | OrderError::InvalidState { .. }
        )
    }
}
