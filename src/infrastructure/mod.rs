//! Infrastructure Layer
//!
//! Connection assembly and probe scheduling.

pub mod connection_factory;
pub mod probe_runner;

pub use connection_factory::{ConnectionDescriptor, ConnectionFactory, Secret};
pub use probe_runner::{ProbePolicy, ProbeRunner};
