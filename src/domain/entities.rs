//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the cart store domain.
//! They have no external dependencies and contain only business logic.

use crate::domain::value_objects::HostCandidate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One product line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    /// Authoritative total for this product, never a delta
    pub quantity: i32,
}

impl CartItem {
    pub fn new(product_id: impl Into<String>, quantity: i32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// All product lines belonging to one user.
///
/// Item order is unspecified; `product_id` is unique within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: String,
    pub items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart is still a valid cart for that user.
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity_of(&self, product_id: &str) -> Option<i32> {
        self.items
            .iter()
            .find(|i| i.product_id == product_id)
            .map(|i| i.quantity)
    }
}

/// Result of one probe attempt against one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyMeasurement {
    pub host: HostCandidate,
    /// `None` when the attempt failed (infinite latency)
    pub elapsed: Option<Duration>,
}

impl LatencyMeasurement {
    pub fn success(host: HostCandidate, elapsed: Duration) -> Self {
        Self {
            host,
            elapsed: Some(elapsed),
        }
    }

    pub fn failure(host: HostCandidate) -> Self {
        Self {
            host,
            elapsed: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.elapsed.is_some()
    }
}

/// Aggregated probe results for one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLatency {
    pub host: HostCandidate,
    pub attempts: u32,
    pub successes: u32,
    /// Mean over successful attempts only; `None` if every attempt failed
    pub mean: Option<Duration>,
}

impl HostLatency {
    /// Aggregate the attempts recorded for `host`.
    pub fn from_measurements(host: HostCandidate, measurements: &[LatencyMeasurement]) -> Self {
        let ok: Vec<Duration> = measurements.iter().filter_map(|m| m.elapsed).collect();
        let successes = ok.len() as u32;
        let mean = if successes == 0 {
            None
        } else {
            Some(ok.iter().sum::<Duration>() / successes)
        };

        Self {
            host,
            attempts: measurements.len() as u32,
            successes,
            mean,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.mean.is_some()
    }
}

/// The replica chosen at startup. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedHost {
    host: HostCandidate,
    mean_latency: Duration,
}

impl SelectedHost {
    pub fn new(host: HostCandidate, mean_latency: Duration) -> Self {
        Self { host, mean_latency }
    }

    pub fn host(&self) -> &HostCandidate {
        &self.host
    }

    pub fn mean_latency(&self) -> Duration {
        self.mean_latency
    }
}
