//! Order-specific resource logic and entity implementation.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use actor_framework::{ResourceActor, ResourceClient};
use crate::model::Order;

/// Creates the order store shards and the client that routes across them.
///
/// The caller spawns each shard with `actor.run(())`.
pub fn new(shards: usize, buffer_size: usize) -> (Vec<ResourceActor<Order>>, ResourceClient<Order>) {
    ResourceActor::sharded(shards, buffer_size)
}
