//! Service configuration.
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `ORDER_SERVICE_STORE_SHARDS` | 4 | order store shard actors |
//! | `ORDER_SERVICE_CHANNEL_BUFFER` | 32 | request queue per shard |
//! | `ORDER_SERVICE_DELIVERY_TIMEOUT_MS` | 1000 | timeout for one notification delivery |
//! | `ORDER_SERVICE_MAX_DELIVERY_FAILURES` | 3 | consecutive failures before eviction |
//! | `ORDER_SERVICE_NOTIFICATION_CAPACITY` | 64 | queue size of channel subscribers |
//! | `ORDER_SERVICE_SEED_DEMO_ORDERS` | true | seed demo orders on start |
//!
//! ```bash
//! ORDER_SERVICE_STORE_SHARDS=8 RUST_LOG=info cargo run
//! ```

use crate::broadcast::BroadcastConfig;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub store_shards: usize,
    pub channel_buffer: usize,
    pub delivery_timeout_ms: u64,
    pub max_delivery_failures: u32,
    pub notification_capacity: usize,
    pub seed_demo_orders: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            store_shards: 4,
            channel_buffer: 32,
            delivery_timeout_ms: 1000,
            max_delivery_failures: 3,
            notification_capacity: 64,
            seed_demo_orders: true,
        }
    }
}

impl ServiceConfig {
    /// Loads from `ORDER_SERVICE_*` variables; unset ones keep their default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            store_shards: read(&lookup, "ORDER_SERVICE_STORE_SHARDS", defaults.store_shards)?,
            channel_buffer: read(&lookup, "ORDER_SERVICE_CHANNEL_BUFFER", defaults.channel_buffer)?,
            delivery_timeout_ms: read(
                &lookup,
                "ORDER_SERVICE_DELIVERY_TIMEOUT_MS",
                defaults.delivery_timeout_ms,
            )?,
            max_delivery_failures: read(
                &lookup,
                "ORDER_SERVICE_MAX_DELIVERY_FAILURES",
                defaults.max_delivery_failures,
            )?,
            notification_capacity: read(
                &lookup,
                "ORDER_SERVICE_NOTIFICATION_CAPACITY",
                defaults.notification_capacity,
            )?,
            seed_demo_orders: read_flag(
                &lookup,
                "ORDER_SERVICE_SEED_DEMO_ORDERS",
                defaults.seed_demo_orders,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects zero for every size and count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("store_shards", self.store_shards as u64),
            ("channel_buffer", self.channel_buffer as u64),
            ("delivery_timeout_ms", self.delivery_timeout_ms),
            ("max_delivery_failures", u64::from(self.max_delivery_failures)),
            ("notification_capacity", self.notification_capacity as u64),
        ];
        match positive.iter().find(|(_, value)| *value == 0) {
            Some((key, _)) => Err(ConfigError::Zero(*key)),
            None => Ok(()),
        }
    }

    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_millis(self.delivery_timeout_ms)
    }

    pub fn broadcast(&self) -> BroadcastConfig {
        BroadcastConfig {
            delivery_timeout: self.delivery_timeout(),
            max_delivery_failures: self.max_delivery_failures,
        }
    }
}

fn read<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn read_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match lookup(key) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(default),
    }
}
