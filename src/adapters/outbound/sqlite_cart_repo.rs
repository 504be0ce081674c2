//! SQLite Cart Repository
//!
//! Implements CartRepository on an embedded SQLite file, for local
//! development. Each call opens the file on a blocking thread, runs its
//! statements and drops the connection. The table must already exist.

use crate::adapters::outbound::cart_sql::{CartStatements, Dialect};
use crate::domain::entities::{Cart, CartItem};
use crate::domain::errors::{CartError, CartResult};
use crate::domain::ports::CartRepository;
use crate::domain::services::cart_rules;
use crate::domain::value_objects::{TableName, UpsertMode};
use async_trait::async_trait;
use rusqlite::{params, Connection, OpenFlags};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Failure inside a blocking storage call.
enum BlockingError {
    Sqlite(rusqlite::Error),
    Rejected(CartError),
}

impl From<rusqlite::Error> for BlockingError {
    fn from(e: rusqlite::Error) -> Self {
        BlockingError::Sqlite(e)
    }
}

struct Inner {
    path: PathBuf,
    table: TableName,
    upsert_mode: UpsertMode,
    sql: CartStatements,
}

/// SQLite-backed cart repository.
#[derive(Clone)]
pub struct SqliteCartRepository {
    inner: Arc<Inner>,
}

impl SqliteCartRepository {
    pub fn new(path: impl AsRef<Path>, table: TableName, upsert_mode: UpsertMode) -> Self {
        let sql = CartStatements::new(&table, Dialect::Sqlite);
        Self {
            inner: Arc::new(Inner {
                path: path.as_ref().to_path_buf(),
                table,
                upsert_mode,
                sql,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Open an existing database file. Never creates one.
    fn open(path: &Path) -> rusqlite::Result<Connection> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    fn storage_error(&self, op: &'static str, err: impl Display) -> CartError {
        let message = format!(
            "can't access cart storage at {} (table {}): {}",
            self.inner.path.display(),
            self.inner.table,
            err
        );
        tracing::error!("cart {} failed: {}", op, message);
        CartError::StorageUnavailable { message }
    }

    /// Run `f` with a fresh connection on the blocking pool.
    async fn with_connection<T, F>(&self, op: &'static str, f: F) -> CartResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &Inner) -> Result<T, BlockingError> + Send + 'static,
    {
        let inner = self.inner.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let conn = Self::open(&inner.path)?;
            f(&conn, inner.as_ref())
        })
        .await;

        match joined {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(BlockingError::Sqlite(e))) => Err(self.storage_error(op, e)),
            Ok(Err(BlockingError::Rejected(e))) => Err(e),
            Err(e) => Err(self.storage_error(op, e)),
        }
    }
}

#[async_trait]
impl CartRepository for SqliteCartRepository {
    async fn add_item(&self, user_id: &str, product_id: &str, quantity: i32) -> CartResult<()> {
        cart_rules::check_added_quantity(user_id, product_id, quantity)?;

        let user_id = user_id.to_string();
        let product_id = product_id.to_string();
        self.with_connection("add_item", move |conn, inner| {
            match inner.upsert_mode {
                UpsertMode::ReadThenWrite => {
                    let mut stmt = conn.prepare(&inner.sql.select_quantity)?;
                    let current: i64 = stmt
                        .query_map(params![user_id, product_id], |row| row.get::<_, i64>(0))?
                        .collect::<Result<Vec<_>, _>>()?
                        .into_iter()
                        .sum();
                    let total = cart_rules::accumulate(&user_id, &product_id, current, quantity)
                        .map_err(BlockingError::Rejected)?;
                    conn.execute(&inner.sql.upsert_total, params![user_id, product_id, total])?;
                }
                UpsertMode::Atomic => {
                    let changed = conn.execute(
                        &inner.sql.upsert_increment,
                        params![user_id, product_id, quantity],
                    )?;
                    if changed == 0 {
                        return Err(BlockingError::Rejected(cart_rules::out_of_range(
                            &user_id,
                            &product_id,
                        )));
                    }
                }
            }
            Ok(())
        })
        .await
    }

    async fn get_cart(&self, user_id: &str) -> CartResult<Cart> {
        let owned = user_id.to_string();
        let items = self
            .with_connection("get_cart", move |conn, inner| {
                let mut stmt = conn.prepare(&inner.sql.select_cart)?;
                let items = stmt
                    .query_map(params![owned], |row| {
                        Ok(CartItem::new(row.get::<_, String>(0)?, row.get::<_, i32>(1)?))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(items)
            })
            .await?;

        Ok(Cart {
            user_id: user_id.to_string(),
            items,
        })
    }

    async fn empty_cart(&self, user_id: &str) -> CartResult<()> {
        let owned = user_id.to_string();
        let removed = self
            .with_connection("empty_cart", move |conn, inner| {
                Ok(conn.execute(&inner.sql.delete_cart, params![owned])?)
            })
            .await?;
        tracing::debug!("emptied cart user={} rows={}", user_id, removed);
        Ok(())
    }

    async fn ping(&self) -> bool {
        let path = self.inner.path.clone();
        let result = tokio::task::spawn_blocking(move || {
            Self::open(&path)?.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
        })
        .await;

        match result {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!("ping {} failed: {}", self.inner.path.display(), e);
                false
            }
            Err(e) => {
                tracing::debug!("ping task failed: {:?}", e);
                false
            }
        }
    }
}
