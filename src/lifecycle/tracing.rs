//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered
//! by `RUST_LOG`. Module paths are hidden; log lines carry structured fields
//! such as `entity_type`, `shard`, `id` and `client_id` instead.
//!
//! ## What Gets Traced
//!
//! - **Shards**: startup and shutdown at `info`, each request at `debug`,
//!   failed hooks at `warn`.
//! - **Engine**: creates, deletes and transitions at `info`, with spans from
//!   `#[instrument]` on every client and façade method.
//! - **Subscriptions**: subscribe, rebind and unsubscribe at `info`; failed
//!   deliveries and evictions at `warn`.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=debug cargo run     # includes payloads and per-broadcast reports
//! ```
//!
//! With `RUST_LOG=info` a transition reads:
//!
//! ```text
//! INFO Action ok entity_type="Order" shard=2 id=5
//! INFO process_order:transition: Order transitioned id=5 state=InWork
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type identifies the source instead
        .compact()
        .init();
}
