//! Domain Layer
//!
//! Entities, value objects, ports and pure services. No I/O lives here.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Cart, CartItem, HostLatency, LatencyMeasurement, SelectedHost};
pub use errors::{CartError, CartResult, ConfigError, ErrorKind};
pub use value_objects::{HostCandidate, ProbeKind, TableName, UpsertMode};
