pub mod cart_sql;
mod postgres_cart_repo;
mod postgres_latency_probe;
mod sqlite_cart_repo;
mod tcp_latency_probe;

pub use cart_sql::{CartStatements, Dialect};
pub use postgres_cart_repo::PostgresCartRepository;
pub use postgres_latency_probe::PostgresLatencyProbe;
pub use sqlite_cart_repo::SqliteCartRepository;
pub use tcp_latency_probe::TcpLatencyProbe;
