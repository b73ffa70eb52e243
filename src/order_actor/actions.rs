//! State transitions for the Order actor.
//!
//! These are the two lifecycle moves that are not plain field edits. They are
//! handled by [`ActorEntity::handle_action`](actor_framework::ActorEntity::handle_action),
//! see [`crate::order_actor::entity`].

/// Lifecycle transitions on an [`Order`](crate::model::Order).
///
/// Both actions reply with the state the order ended up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// `New -> InWork`. Stamps the order date.
    Process,
    /// `InWork -> Closed`. Stamps the shipped date.
    Close,
}

impl OrderAction {
    pub fn name(self) -> &'static str {
        match self {
            OrderAction::Process => "process",
            OrderAction::Close => "close",
        }
    }
}
