//! Latency Probe Port
//!
//! Defines the interface for timing a single round-trip to a replica.

use crate::domain::value_objects::HostCandidate;
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of one probe attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Round-trip completed in the given wall-clock time
    Reachable(Duration),
    /// Any failure: refused, unresolvable, timed out, rejected login
    Unreachable(String),
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable(_))
    }
}

/// Times one short-lived connection to a candidate host.
///
/// Implementations must not return errors: every failure is reported as
/// [`ProbeOutcome::Unreachable`].
#[async_trait]
pub trait LatencyProbe: Send + Sync {
    async fn probe(&self, host: &HostCandidate) -> ProbeOutcome;
}
