//! Subscribers and the registry that owns them.
//!
//! A subscriber is a caller-chosen client id bound to a [`NotificationSink`].
//! The [`SubscriptionRegistry`] owns every live subscriber; the broadcaster only
//! ever works from a [`snapshot`](SubscriptionRegistry::snapshot).

pub mod registry;
pub mod sink;

pub use registry::*;
pub use sink::*;
