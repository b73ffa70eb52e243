//! Runtime orchestration and lifecycle management.
//!
//! - [`OrderSystem`] spawns and wires every actor and shuts them down again
//! - [`ServiceConfig`] is loaded from the environment
//! - [`setup_tracing`] initializes logging for the binary

pub mod config;
pub mod order_system;
pub mod seed;
pub mod tracing;

pub use self::config::*;
pub use self::order_system::*;
pub use self::seed::*;
pub use self::tracing::*;
