//! # Actor Framework
//!
//! Building blocks for sharded, actor-owned resource stores on Tokio.
//!
//! A resource type implements [`ActorEntity`]; the framework runs one or more
//! [`ResourceActor`] shards that own the records, and hands out a cloneable
//! [`ResourceClient`] that routes each request to the owning shard.
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]) – the business rules, as lifecycle hooks.
//! 2. **Runtime** ([`ResourceActor`]) – one task per shard, requests processed
//!    sequentially within a shard and in parallel across shards.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]) – typed async calls.
//!
//! ## Concurrency Model
//!
//! - Each shard owns its slice of the records exclusively, so no record is
//!   ever behind a shared lock.
//! - Requests for different shards never wait on each other.
//! - Every single-record operation is atomic: hooks run on a draft that is
//!   committed only on success.
//!
//! ## Testing
//!
//! See [`mock`] for a scripted client that needs no running shard.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
