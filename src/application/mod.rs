//! Application Layer
//!
//! Use cases wiring the domain ports to concrete adapters.

pub mod bootstrap;
mod cart_service;

pub use bootstrap::{connect, select_replica};
pub use cart_service::CartService;
