//! Probe Runner
//!
//! Runs the attempt sequence of a [`LatencyProbe`] against every candidate
//! host, one task per host, and aggregates the results.

use crate::domain::entities::{HostLatency, LatencyMeasurement};
use crate::domain::ports::{LatencyProbe, ProbeOutcome};
use crate::domain::value_objects::HostCandidate;
use std::sync::Arc;
use std::time::Duration;

/// Probe scheduling configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePolicy {
    /// Attempts per host (at least one is always made)
    pub attempts: u32,
    /// Pause between two attempts against the same host
    pub delay: Duration,
    /// Upper bound for a single attempt
    pub timeout: Duration,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_secs(1),
            timeout: Duration::from_secs(2),
        }
    }
}

/// Drives a latency probe over a set of hosts.
pub struct ProbeRunner {
    probe: Arc<dyn LatencyProbe>,
    policy: ProbePolicy,
}

impl ProbeRunner {
    pub fn new(probe: Arc<dyn LatencyProbe>, policy: ProbePolicy) -> Self {
        Self { probe, policy }
    }

    pub fn policy(&self) -> &ProbePolicy {
        &self.policy
    }

    /// Probe every host concurrently and return one aggregate per host,
    /// in the same order as `hosts`.
    pub async fn probe_all(&self, hosts: &[HostCandidate]) -> Vec<HostLatency> {
        let handles: Vec<_> = hosts
            .iter()
            .cloned()
            .map(|host| {
                let probe = self.probe.clone();
                let policy = self.policy.clone();
                tokio::spawn(async move {
                    let measurements = Self::run_attempts(probe.as_ref(), &host, &policy).await;
                    HostLatency::from_measurements(host, &measurements)
                })
            })
            .collect();

        let mut results = Vec::with_capacity(hosts.len());
        for (host, handle) in hosts.iter().zip(handles) {
            match handle.await {
                Ok(stats) => {
                    match stats.mean {
                        Some(mean) => tracing::info!(
                            "replica probe host={} successes={}/{} mean_ms={:.2}",
                            stats.host,
                            stats.successes,
                            stats.attempts,
                            mean.as_secs_f64() * 1000.0
                        ),
                        None => tracing::warn!(
                            "replica probe host={} unreachable after {} attempts",
                            stats.host,
                            stats.attempts
                        ),
                    }
                    results.push(stats);
                }
                Err(e) => {
                    tracing::error!("probe task for host={} failed: {:?}", host, e);
                    results.push(HostLatency::from_measurements(host.clone(), &[]));
                }
            }
        }

        results
    }

    async fn run_attempts(
        probe: &dyn LatencyProbe,
        host: &HostCandidate,
        policy: &ProbePolicy,
    ) -> Vec<LatencyMeasurement> {
        let attempts = policy.attempts.max(1);
        let mut measurements = Vec::new();

        for attempt in 1..=attempts {
            let outcome = match tokio::time::timeout(policy.timeout, probe.probe(host)).await {
                Ok(outcome) => outcome,
                Err(_) => ProbeOutcome::Unreachable("probe timeout".to_string()),
            };

            match outcome {
                ProbeOutcome::Reachable(elapsed) => {
                    tracing::debug!(
                        "probe host={} attempt={}/{} latency_us={}",
                        host,
                        attempt,
                        attempts,
                        elapsed.as_micros()
                    );
                    measurements.push(LatencyMeasurement::success(host.clone(), elapsed));
                }
                ProbeOutcome::Unreachable(reason) => {
                    tracing::debug!(
                        "probe host={} attempt={}/{} unreachable: {}",
                        host,
                        attempt,
                        attempts,
                        reason
                    );
                    measurements.push(LatencyMeasurement::failure(host.clone()));
                }
            }

            if attempt < attempts && !policy.delay.is_zero() {
                tokio::time::sleep(policy.delay).await;
            }
        }

        measurements
    }
}
