//! # Order Service
//!
//! > **An order-processing backend on resource-oriented actors.**
//!
//! Orders live in a sharded actor store, move through a small lifecycle
//! (`New -> InWork -> Closed`), and every transition is pushed to the clients
//! that subscribed for status changes.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`])
//! [`Order`](model::Order), its editable [`OrderDraft`](model::OrderDraft), and the
//! [`StatusChangeEvent`](model::StatusChangeEvent) sent to subscribers.
//!
//! ### 2. The Store ([`order_actor`])
//! [`ActorEntity`](actor_framework::ActorEntity) implementation for orders. The
//! state rules live in its hooks, so they run inside the shard that owns the
//! order and are atomic per order.
//!
//! ### 3. The Engine ([`clients`])
//! [`OrderClient`](clients::OrderClient) maps store replies to
//! [`OrderError`](order_actor::OrderError) and publishes a status change after
//! every successful transition.
//!
//! ### 4. Notifications ([`subscription`], [`broadcast`])
//! A concurrent registry of [`NotificationSink`](subscription::NotificationSink)s
//! and a broadcaster task that fans events out to a snapshot of it, evicting
//! sinks that keep failing.
//!
//! ### 5. The Surface ([`service`])
//! [`OrderService`](service::OrderService) is what a transport calls: one method
//! per client operation, plus a cancellable long-running operation.
//!
//! ### 6. The Orchestrator ([`lifecycle`])
//! Configuration, tracing, demo seed data and
//! [`OrderSystem`](lifecycle::OrderSystem), which wires and stops everything.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod broadcast;
pub mod clients;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod service;
pub mod subscription;
