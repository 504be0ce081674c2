//! Integration tests against a live PostgreSQL replica
//!
//! Ignored by default. Run with the environment the binary uses
//! (`POSTGRES_DATABASE_NAME`, `PGEDGE_HOSTS_LIST`, `POSTGRES_USERNAME`,
//! `POSTGRES_PASSWORD`) and `cargo test -- --ignored`. Each test owns its
//! table, recreating it on start and dropping it at the end.

use cartstore::{connect, Cart, CartError, CartItem, CartService, Config};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

fn live_config(table: &str, upsert_mode: &str) -> Option<Config> {
    std::env::var("PGEDGE_HOSTS_LIST").ok()?;
    let config = Config::from_lookup(|key| match key {
        "CARTSTORE_BACKEND" => Some("postgres".to_string()),
        "POSTGRES_TABLE_NAME" => Some(table.to_string()),
        "CARTSTORE_UPSERT_MODE" => Some(upsert_mode.to_string()),
        _ => std::env::var(key).ok(),
    })
    .unwrap();
    Some(config)
}

/// Direct connection to the selected replica, for table setup.
async fn admin_connection(config: &Config, service: &CartService) -> PgConnection {
    let host = service.selected_host().unwrap().host();
    let mut options = PgConnectOptions::new_without_pgpass()
        .host(&host.address)
        .port(host.port)
        .username(&config.username)
        .database(&config.database_name);
    if !config.password.is_empty() {
        options = options.password(config.password.expose());
    }
    PgConnection::connect_with(&options).await.unwrap()
}

async fn run_lifecycle(table: &str, upsert_mode: &str) {
    let Some(config) = live_config(table, upsert_mode) else {
        eprintln!("PGEDGE_HOSTS_LIST is not set, skipping");
        return;
    };

    let service = connect(&config).await.unwrap();
    let mut admin = admin_connection(&config, &service).await;
    sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
        .execute(&mut admin)
        .await
        .unwrap();
    sqlx::query(&format!(
        "CREATE TABLE {table} (userId TEXT NOT NULL, productId TEXT NOT NULL, \
         quantity INTEGER NOT NULL, UNIQUE (userId, productId))"
    ))
    .execute(&mut admin)
    .await
    .unwrap();

    assert!(service.ping().await);

    // accumulation
    service.add_item("u1", "p1", 2).await.unwrap();
    service.add_item("u1", "p1", 3).await.unwrap();
    service.add_item("u1", "p2", 1).await.unwrap();
    service.add_item("u2", "p1", 7).await.unwrap();

    let mut items = service.get_cart("u1").await.unwrap().items;
    items.sort_by(|a, b| a.product_id.cmp(&b.product_id));
    assert_eq!(items, vec![CartItem::new("p1", 5), CartItem::new("p2", 1)]);

    // column limit
    service.add_item("u1", "p3", i32::MAX).await.unwrap();
    let err = service.add_item("u1", "p3", 1).await.unwrap_err();
    assert!(matches!(err, CartError::InvalidQuantity { .. }));
    assert_eq!(service.get_cart("u1").await.unwrap().quantity_of("p3"), Some(i32::MAX));

    // ids are bound, not spliced
    service.add_item("o'brien", "p1", 1).await.unwrap();
    service.empty_cart("x' OR '1'='1").await.unwrap();
    assert_eq!(service.get_cart("o'brien").await.unwrap().quantity_of("p1"), Some(1));

    // emptying
    service.empty_cart("u1").await.unwrap();
    service.empty_cart("u1").await.unwrap();
    assert_eq!(service.get_cart("u1").await.unwrap(), Cart::empty("u1"));
    assert_eq!(service.get_cart("u2").await.unwrap().quantity_of("p1"), Some(7));

    sqlx::query(&format!("DROP TABLE {table}"))
        .execute(&mut admin)
        .await
        .unwrap();
    admin.close().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_postgres_read_then_write_lifecycle() {
    run_lifecycle("cartstore_it_read_then_write", "read-then-write").await;
}

#[tokio::test]
#[ignore]
async fn test_postgres_atomic_lifecycle() {
    run_lifecycle("cartstore_it_atomic", "atomic").await;
}
