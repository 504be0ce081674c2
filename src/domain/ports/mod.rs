mod cart_repository;
mod latency_probe;

pub use cart_repository::CartRepository;
pub use latency_probe::{LatencyProbe, ProbeOutcome};
