//! cartstore Library
//!
//! Persistence layer for the cart service: picks the lowest-latency
//! database replica at startup, then serves per-user cart operations
//! against it.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{connect, select_replica, CartService};
pub use config::{load_config, Config, StoreBackend};
pub use domain::entities::{Cart, CartItem, HostLatency, LatencyMeasurement, SelectedHost};
pub use domain::errors::{CartError, CartResult, ConfigError, ErrorKind};
pub use domain::ports::{CartRepository, LatencyProbe, ProbeOutcome};
pub use domain::services::HostSelector;
pub use domain::value_objects::{HostCandidate, ProbeKind, TableName, UpsertMode};
pub use infrastructure::{ConnectionDescriptor, ConnectionFactory, ProbePolicy, ProbeRunner, Secret};
