//! PostgreSQL Cart Repository
//!
//! Implements CartRepository against the replica chosen at startup.
//! Every call opens its own connection and closes it before returning.

use crate::adapters::outbound::cart_sql::{CartStatements, Dialect};
use crate::domain::entities::{Cart, CartItem};
use crate::domain::errors::{CartError, CartResult};
use crate::domain::ports::CartRepository;
use crate::domain::services::cart_rules;
use crate::domain::value_objects::{TableName, UpsertMode};
use crate::infrastructure::connection_factory::ConnectionDescriptor;
use async_trait::async_trait;
use sqlx::postgres::PgConnection;
use sqlx::{Connection, Postgres};
use std::fmt::Display;

/// PostgreSQL-backed cart repository.
///
/// Holds the connection descriptor for the selected replica for its whole
/// lifetime; there is no re-selection or failover.
pub struct PostgresCartRepository {
    descriptor: ConnectionDescriptor,
    table: TableName,
    upsert_mode: UpsertMode,
    sql: CartStatements,
}

impl PostgresCartRepository {
    pub fn new(descriptor: ConnectionDescriptor, table: TableName, upsert_mode: UpsertMode) -> Self {
        let sql = CartStatements::new(&table, Dialect::Postgres);
        Self {
            descriptor,
            table,
            upsert_mode,
            sql,
        }
    }

    async fn open(&self, op: &'static str) -> CartResult<PgConnection> {
        PgConnection::connect_with(&self.descriptor.pg_options())
            .await
            .map_err(|e| self.storage_error(op, e))
    }

    async fn release(&self, conn: PgConnection) {
        if let Err(e) = conn.close().await {
            tracing::debug!(
                "closing connection to {} failed: {}",
                self.descriptor.host(),
                self.descriptor.redact(&e.to_string())
            );
        }
    }

    /// Wrap a driver failure, naming only host and table.
    fn storage_error(&self, op: &'static str, err: impl Display) -> CartError {
        let message = format!(
            "can't access cart storage at {} (table {}): {}",
            self.descriptor.host(),
            self.table,
            self.descriptor.redact(&err.to_string())
        );
        tracing::error!("cart {} failed: {}", op, message);
        CartError::StorageUnavailable { message }
    }

    async fn write_item(
        &self,
        conn: &mut PgConnection,
        user_id: &str,
        product_id: &str,
        quantity: i32,
    ) -> CartResult<()> {
        match self.upsert_mode {
            UpsertMode::ReadThenWrite => {
                let stored: Vec<i32> = sqlx::query_scalar::<Postgres, i32>(&self.sql.select_quantity)
                    .bind(user_id)
                    .bind(product_id)
                    .fetch_all(&mut *conn)
                    .await
                    .map_err(|e| self.storage_error("add_item", e))?;
                let current: i64 = stored.iter().map(|q| i64::from(*q)).sum();
                let total = cart_rules::accumulate(user_id, product_id, current, quantity)?;

                sqlx::query(&self.sql.upsert_total)
                    .bind(user_id)
                    .bind(product_id)
                    .bind(total)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| self.storage_error("add_item", e))?;
            }
            UpsertMode::Atomic => {
                let done = sqlx::query(&self.sql.upsert_increment)
                    .bind(user_id)
                    .bind(product_id)
                    .bind(quantity)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| self.storage_error("add_item", e))?;
                if done.rows_affected() == 0 {
                    return Err(cart_rules::out_of_range(user_id, product_id));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CartRepository for PostgresCartRepository {
    async fn add_item(&self, user_id: &str, product_id: &str, quantity: i32) -> CartResult<()> {
        cart_rules::check_added_quantity(user_id, product_id, quantity)?;

        let mut conn = self.open("add_item").await?;
        let result = self.write_item(&mut conn, user_id, product_id, quantity).await;
        self.release(conn).await;
        result
    }

    async fn get_cart(&self, user_id: &str) -> CartResult<Cart> {
        let mut conn = self.open("get_cart").await?;
        let rows = sqlx::query_as::<Postgres, (String, i32)>(&self.sql.select_cart)
            .bind(user_id)
            .fetch_all(&mut conn)
            .await;
        self.release(conn).await;

        let rows = rows.map_err(|e| self.storage_error("get_cart", e))?;
        Ok(Cart {
            user_id: user_id.to_string(),
            items: rows
                .into_iter()
                .map(|(product_id, quantity)| CartItem::new(product_id, quantity))
                .collect(),
        })
    }

    async fn empty_cart(&self, user_id: &str) -> CartResult<()> {
        let mut conn = self.open("empty_cart").await?;
        let result = sqlx::query(&self.sql.delete_cart)
            .bind(user_id)
            .execute(&mut conn)
            .await;
        self.release(conn).await;

        let done = result.map_err(|e| self.storage_error("empty_cart", e))?;
        tracing::debug!("emptied cart user={} rows={}", user_id, done.rows_affected());
        Ok(())
    }

    async fn ping(&self) -> bool {
        match PgConnection::connect_with(&self.descriptor.pg_options()).await {
            Ok(conn) => {
                self.release(conn).await;
                true
            }
            Err(e) => {
                tracing::debug!(
                    "ping {} failed: {}",
                    self.descriptor.host(),
                    self.descriptor.redact(&e.to_string())
                );
                false
            }
        }
    }
}
