//! cartstore - replica selection and cart store liveness check
//!
//! Composition root: loads configuration, picks the replica and verifies
//! the cart store answers. Exits non-zero when no store can be built.

use cartstore::{connect, load_config};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting cartstore backend={:?} hosts={} table={}",
        cfg.backend,
        cfg.hosts.len(),
        cfg.table
    );

    let service = connect(&cfg).await?;

    if service.ping().await {
        tracing::info!("cart store reachable");
        Ok(())
    } else {
        tracing::error!("cart store did not accept a connection");
        anyhow::bail!("cart store unreachable")
    }
}
