//! Domain-specific clients wrapping the generic [`ResourceClient`](actor_framework::ResourceClient).

pub mod order_client;

pub use actor_framework::ActorClient;
pub use order_client::*;
