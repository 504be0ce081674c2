//! Adapters Layer
//!
//! Outbound adapters implementing the domain ports against real
//! infrastructure (TCP, PostgreSQL, SQLite).

pub mod outbound;
