//! SQL statements for the cart table.
//!
//! The table name is a validated identifier and is the only value spliced
//! into the text; user and product ids are always bound parameters.

use crate::domain::value_objects::TableName;

/// Placeholder and upsert flavour of the target database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

/// Prepared statement text for one cart table.
#[derive(Debug, Clone)]
pub struct CartStatements {
    /// Every stored quantity for (user, product)
    pub select_quantity: String,
    /// Insert or overwrite with an absolute total
    pub upsert_total: String,
    /// Insert or add to the stored total in one statement. The update is
    /// skipped when the sum would exceed `i32::MAX`, leaving zero rows
    /// affected.
    pub upsert_increment: String,
    pub select_cart: String,
    pub delete_cart: String,
}

impl CartStatements {
    pub fn new(table: &TableName, dialect: Dialect) -> Self {
        let (p1, p2, p3) = match dialect {
            Dialect::Postgres => ("$1", "$2", "$3"),
            Dialect::Sqlite => ("?1", "?2", "?3"),
        };
        let (increment, stored) = match dialect {
            Dialect::Postgres => ("cart.quantity + EXCLUDED.quantity", "cart.quantity"),
            Dialect::Sqlite => ("quantity + excluded.quantity", "quantity"),
        };
        let max = i32::MAX;
        let alias = match dialect {
            Dialect::Postgres => " AS cart",
            Dialect::Sqlite => "",
        };

        Self {
            select_quantity: format!(
                "SELECT quantity FROM {table} WHERE userId = {p1} AND productId = {p2}"
            ),
            upsert_total: format!(
                "INSERT INTO {table} (userId, productId, quantity) VALUES ({p1}, {p2}, {p3}) \
                 ON CONFLICT (userId, productId) DO UPDATE SET quantity = excluded.quantity"
            ),
            upsert_increment: format!(
                "INSERT INTO {table}{alias} (userId, productId, quantity) VALUES ({p1}, {p2}, {p3}) \
                 ON CONFLICT (userId, productId) DO UPDATE SET quantity = {increment} \
                 WHERE {stored} <= {max} - excluded.quantity"
            ),
            select_cart: format!("SELECT productId, quantity FROM {table} WHERE userId = {p1}"),
            delete_cart: format!("DELETE FROM {table} WHERE userId = {p1}"),
        }
    }
}

/// Cart table layout used to provision test stores.
#[cfg(test)]
pub(crate) const CART_TABLE_COLUMNS: &str =
    "userId TEXT NOT NULL, productId TEXT NOT NULL, quantity INTEGER NOT NULL, \
     UNIQUE (userId, productId)";
