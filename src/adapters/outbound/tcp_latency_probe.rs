//! TCP Latency Probe
//!
//! Implements LatencyProbe by timing a bare TCP connect to the replica.

use crate::domain::ports::{LatencyProbe, ProbeOutcome};
use crate::domain::value_objects::HostCandidate;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Times how long the replica takes to accept a TCP connection.
///
/// No credentials are involved; a listening port counts as reachable.
pub struct TcpLatencyProbe {
    connect_timeout: Duration,
}

impl TcpLatencyProbe {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for TcpLatencyProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl LatencyProbe for TcpLatencyProbe {
    async fn probe(&self, host: &HostCandidate) -> ProbeOutcome {
        let addr = host.socket_addr_string();
        let start = Instant::now();

        match tokio::time::timeout(self.connect_timeout, TcpStream::connect(&addr)).await {
            Ok(Ok(mut stream)) => {
                let elapsed = start.elapsed();
                let _ = stream.shutdown().await;
                ProbeOutcome::Reachable(elapsed)
            }
            Ok(Err(e)) => ProbeOutcome::Unreachable(format!("connection failed: {}", e)),
            Err(_) => ProbeOutcome::Unreachable("connection timeout".to_string()),
        }
    }
}
