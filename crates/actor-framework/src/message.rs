//! # Generic Messages
//!
//! The request enum exchanged between a [`ResourceClient`](crate::ResourceClient)
//! and a [`ResourceActor`](crate::ResourceActor) shard.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Request sent to a shard.
///
/// The variants are the store primitives every resource shares, plus `Action`
/// for resource-specific operations:
///
/// - **Create**: insert a new entity under an id allocated by the client.
/// - **Get**: snapshot of one entity, `None` when absent.
/// - **List**: snapshot of every entity held by the shard.
/// - **Update**: apply an [`ActorEntity::Update`] and return the new snapshot.
/// - **Delete**: remove an entity; replies with the number removed (0 or 1).
/// - **Action**: run an [`ActorEntity::Action`] against the entity.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        id: T::Id,
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<usize>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

impl<T: ActorEntity> ResourceRequest<T> {
    /// Short name of the request variant, for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceRequest::Create { .. } => "Create",
            ResourceRequest::Get { .. } => "Get",
            ResourceRequest::List { .. } => "List",
            ResourceRequest::Update { .. } => "Update",
            ResourceRequest::Delete { .. } => "Delete",
            ResourceRequest::Action { .. } => "Action",
        }
    }
}
