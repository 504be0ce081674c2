//! Cart Repository Port
//!
//! Defines the operation surface over the per-user cart table.
//! Implementations may use PostgreSQL or an embedded SQLite file.

use crate::domain::entities::Cart;
use crate::domain::errors::CartResult;
use async_trait::async_trait;

/// Repository for per-user cart contents.
///
/// This is an outbound port. Every call is independent: implementations
/// open their own connection, use it and release it before returning.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Add `quantity` units of a product to a user's cart, creating the
    /// line if it does not exist yet.
    async fn add_item(&self, user_id: &str, product_id: &str, quantity: i32) -> CartResult<()>;

    /// Get the user's cart. Unknown users get an empty cart.
    async fn get_cart(&self, user_id: &str) -> CartResult<Cart>;

    /// Remove every line for the user. Emptying an empty cart succeeds.
    async fn empty_cart(&self, user_id: &str) -> CartResult<()>;

    /// Check that the store accepts connections. Never fails.
    async fn ping(&self) -> bool;
}
