//! Startup wiring
//!
//! Selects the replica once, builds the connection descriptor and hands
//! both to the repository. Nothing here runs again after construction.

use crate::adapters::outbound::{
    PostgresCartRepository, PostgresLatencyProbe, SqliteCartRepository, TcpLatencyProbe,
};
use crate::application::CartService;
use crate::config::{Config, StoreBackend};
use crate::domain::entities::SelectedHost;
use crate::domain::errors::{CartResult, ConfigError};
use crate::domain::ports::{CartRepository, LatencyProbe};
use crate::domain::services::HostSelector;
use crate::domain::value_objects::{HostCandidate, ProbeKind};
use crate::infrastructure::connection_factory::ConnectionFactory;
use crate::infrastructure::probe_runner::ProbeRunner;
use std::sync::Arc;

/// Probe every candidate and pick the one with the lowest mean latency.
///
/// # Errors
/// - [`ConfigError::NoCandidates`] when `hosts` is empty.
/// - [`ConfigError::NoReachableHost`] when no host answered any attempt.
pub async fn select_replica(
    hosts: &[HostCandidate],
    runner: &ProbeRunner,
) -> Result<SelectedHost, ConfigError> {
    if hosts.is_empty() {
        return Err(ConfigError::NoCandidates);
    }

    tracing::info!(
        "probing {} replica hosts attempts={} delay_ms={} timeout_ms={}",
        hosts.len(),
        runner.policy().attempts,
        runner.policy().delay.as_millis(),
        runner.policy().timeout.as_millis()
    );

    let stats = runner.probe_all(hosts).await;
    match HostSelector::pick_host(&stats) {
        Ok(selected) => {
            tracing::info!(
                "selected replica host={} mean_ms={:.2}",
                selected.host(),
                selected.mean_latency().as_secs_f64() * 1000.0
            );
            Ok(selected)
        }
        Err(e) => {
            tracing::error!("replica selection failed: {}", e);
            Err(e)
        }
    }
}

fn latency_probe(config: &Config, factory: &ConnectionFactory) -> Arc<dyn LatencyProbe> {
    match config.probe_kind {
        ProbeKind::Tcp => Arc::new(TcpLatencyProbe::new(config.probe.timeout)),
        ProbeKind::Query => Arc::new(PostgresLatencyProbe::new(factory.clone())),
    }
}

/// Construct the cart service described by `config`.
///
/// For PostgreSQL this probes the replicas first and fails if none is
/// reachable; no service exists in that case.
pub async fn connect(config: &Config) -> CartResult<CartService> {
    match config.backend {
        StoreBackend::Postgres => {
            let factory = ConnectionFactory::new(
                config.database_name.clone(),
                config.username.clone(),
                config.password.clone(),
            );
            let runner = ProbeRunner::new(
                latency_probe(config, &factory),
                config.probe.clone(),
            );

            tracing::debug!("replica probe kind={}", config.probe_kind.as_str());
            let selected = select_replica(&config.hosts, &runner).await?;
            let descriptor = factory.build(&selected);
            tracing::info!(
                "cart store ready backend=postgres host={} database={} table={} upsert_mode={}",
                descriptor.host(),
                descriptor.database(),
                config.table,
                config.upsert_mode.as_str()
            );
            let repo: Arc<dyn CartRepository> = Arc::new(PostgresCartRepository::new(
                descriptor,
                config.table.clone(),
                config.upsert_mode,
            ));
            Ok(CartService::new(repo, Some(selected)))
        }
        StoreBackend::Sqlite => {
            let repo: Arc<dyn CartRepository> = Arc::new(SqliteCartRepository::new(
                &config.sqlite_path,
                config.table.clone(),
                config.upsert_mode,
            ));
            tracing::info!(
                "cart store ready backend=sqlite path={} table={} upsert_mode={}",
                config.sqlite_path,
                config.table,
                config.upsert_mode.as_str()
            );
            Ok(CartService::new(repo, None))
        }
    }
}
