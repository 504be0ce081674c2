//! Integration tests for replica selection against real sockets
//!
//! Listening ports stand in for replicas; ports with no listener behave
//! like replicas refusing connections.

use cartstore::{
    connect, select_replica, CartError, Config, ConfigError, HostCandidate, ProbePolicy,
    ProbeRunner,
};
use cartstore::adapters::outbound::TcpLatencyProbe;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Start a listener that accepts and immediately drops every connection.
async fn start_replica() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });
    port
}

/// A port with nothing listening on it.
async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

fn tcp_runner() -> ProbeRunner {
    ProbeRunner::new(
        Arc::new(TcpLatencyProbe::new(Duration::from_millis(500))),
        ProbePolicy {
            attempts: 3,
            delay: Duration::from_millis(5),
            timeout: Duration::from_millis(500),
        },
    )
}

fn postgres_config(hosts: String) -> Config {
    let env: HashMap<&str, String> = HashMap::from([
        ("POSTGRES_DATABASE_NAME", "carts".to_string()),
        ("PGEDGE_HOSTS_LIST", hosts),
        ("POSTGRES_USERNAME", "cart_user".to_string()),
        ("POSTGRES_PASSWORD", "s3cr3t-pass".to_string()),
        ("POSTGRES_TABLE_NAME", "cart_items".to_string()),
        ("CARTSTORE_PROBE_ATTEMPTS", "2".to_string()),
        ("CARTSTORE_PROBE_DELAY_MS", "5".to_string()),
        ("CARTSTORE_PROBE_TIMEOUT_MS", "500".to_string()),
    ]);
    Config::from_lookup(|key| env.get(key).cloned()).unwrap()
}

#[tokio::test]
async fn test_selects_the_only_reachable_replica() {
    let down = closed_port().await;
    let up = start_replica().await;
    let hosts = vec![
        HostCandidate::new("127.0.0.1", down),
        HostCandidate::new("127.0.0.1", up),
    ];

    let selected = select_replica(&hosts, &tcp_runner()).await.unwrap();
    assert_eq!(selected.host().port, up);
}

#[tokio::test]
async fn test_selects_one_of_several_reachable_replicas() {
    let a = start_replica().await;
    let b = start_replica().await;
    let hosts = vec![
        HostCandidate::new("127.0.0.1", a),
        HostCandidate::new("127.0.0.1", b),
    ];

    let selected = select_replica(&hosts, &tcp_runner()).await.unwrap();
    assert!(selected.host().port == a || selected.host().port == b);
}

#[tokio::test]
async fn test_all_replicas_refusing_is_a_configuration_error() {
    let hosts = vec![
        HostCandidate::new("127.0.0.1", closed_port().await),
        HostCandidate::new("127.0.0.1", closed_port().await),
    ];

    let result = select_replica(&hosts, &tcp_runner()).await;
    assert_eq!(result, Err(ConfigError::NoReachableHost { candidates: 2 }));
}

#[tokio::test]
async fn test_connect_refuses_to_build_without_reachable_replica() {
    let config = postgres_config(format!(
        "127.0.0.1:{}, 127.0.0.1:{}",
        closed_port().await,
        closed_port().await
    ));

    let result = connect(&config).await;
    assert!(matches!(
        result,
        Err(CartError::Configuration(ConfigError::NoReachableHost { candidates: 2 }))
    ));
}

#[tokio::test]
async fn test_connect_binds_to_selected_replica() {
    let down = closed_port().await;
    let up = start_replica().await;
    let config = postgres_config(format!("127.0.0.1:{down},127.0.0.1:{up}"));

    let service = connect(&config).await.unwrap();
    assert_eq!(service.selected_host().unwrap().host().port, up);

    // The stand-in replica is not a database: operations fail cleanly.
    assert!(!service.ping().await);
    let err = service.get_cart("u1").await.unwrap_err();
    assert_eq!(err.kind().as_str(), "failed_precondition");
    let message = err.to_string();
    assert!(message.contains(&format!("127.0.0.1:{up}")));
    assert!(!message.contains("s3cr3t-pass"));
}
