//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract a resource (an order, a ticket, a
//! reservation, ...) implements to be owned by a [`ResourceActor`](crate::ResourceActor).
//! It names the DTOs the resource accepts and provides lifecycle hooks that the
//! actor calls while it holds exclusive access to the record.
//!
//! # Hooks and atomicity
//!
//! `on_update` and `handle_action` run against a *draft copy* of the stored
//! record. The actor commits the draft only when the hook returns `Ok`, so a
//! hook that rejects a request can never leave a half-applied mutation behind.
//!
//! `on_create` and `on_delete` have default implementations that accept
//! everything; override them to validate or veto.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// Hooks are `async` so that an entity may consult other actors. The `Context`
/// associated type is injected into every hook by [`ResourceActor::run`](crate::ResourceActor::run),
/// which lets dependencies be wired after the actor is constructed.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    /// Ids are allocated from a `u32` sequence starting at 1. A sequence
    /// value the id type cannot represent ends allocation with
    /// [`FrameworkError::IdsExhausted`](crate::FrameworkError::IdsExhausted).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + TryFrom<u32>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations beyond CRUD (e.g. a state transition).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One enum per entity, not one per message: clients match on a single
    /// type regardless of which operation failed.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full entity from the allocated id and the create payload.
    /// Returning `Err` rejects the request before anything is stored.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called after construction, before the entity is inserted.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update to a draft of the stored entity.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called before the entity is removed. Returning `Err` vetoes the removal.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handles a custom action against a draft of the stored entity.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
