//! PostgreSQL Latency Probe
//!
//! Implements LatencyProbe by logging in to the replica and running
//! `SELECT version()`, so the measurement covers a full query round-trip.

use crate::domain::ports::{LatencyProbe, ProbeOutcome};
use crate::domain::value_objects::HostCandidate;
use crate::infrastructure::connection_factory::ConnectionFactory;
use async_trait::async_trait;
use sqlx::postgres::PgConnection;
use sqlx::Connection;
use std::time::Instant;

pub const VERSION_QUERY: &str = "SELECT version()";

/// Authenticated query probe.
pub struct PostgresLatencyProbe {
    factory: ConnectionFactory,
}

impl PostgresLatencyProbe {
    pub fn new(factory: ConnectionFactory) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl LatencyProbe for PostgresLatencyProbe {
    async fn probe(&self, host: &HostCandidate) -> ProbeOutcome {
        let descriptor = self.factory.for_host(host);
        let start = Instant::now();

        let mut conn = match PgConnection::connect_with(&descriptor.pg_options()).await {
            Ok(conn) => conn,
            Err(e) => return ProbeOutcome::Unreachable(descriptor.redact(&e.to_string())),
        };

        let result = sqlx::query_scalar::<sqlx::Postgres, String>(VERSION_QUERY)
            .fetch_one(&mut conn)
            .await;
        let elapsed = start.elapsed();
        let _ = conn.close().await;

        match result {
            Ok(_) => ProbeOutcome::Reachable(elapsed),
            Err(e) => ProbeOutcome::Unreachable(descriptor.redact(&e.to_string())),
        }
    }
}
