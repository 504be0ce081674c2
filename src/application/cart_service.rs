//! Cart Service - operation surface for the RPC layer
//!
//! Thin use-case wrapper over a [`CartRepository`]. The RPC layer maps
//! [`CartError::kind`](crate::domain::errors::CartError::kind) onto its own
//! status codes.

use crate::domain::entities::{Cart, SelectedHost};
use crate::domain::errors::CartResult;
use crate::domain::ports::CartRepository;
use std::sync::Arc;

/// Cart operations against the store chosen at startup.
pub struct CartService {
    repo: Arc<dyn CartRepository>,
    selected: Option<SelectedHost>,
}

impl CartService {
    /// Create a service over `repo`. `selected` is the replica the
    /// repository is bound to, when host selection took place.
    pub fn new(repo: Arc<dyn CartRepository>, selected: Option<SelectedHost>) -> Self {
        Self { repo, selected }
    }

    pub fn selected_host(&self) -> Option<&SelectedHost> {
        self.selected.as_ref()
    }

    pub async fn add_item(&self, user_id: &str, product_id: &str, quantity: i32) -> CartResult<()> {
        tracing::debug!(
            "add_item called user={} product={} quantity={}",
            user_id,
            product_id,
            quantity
        );
        self.repo.add_item(user_id, product_id, quantity).await
    }

    pub async fn get_cart(&self, user_id: &str) -> CartResult<Cart> {
        tracing::debug!("get_cart called user={}", user_id);
        self.repo.get_cart(user_id).await
    }

    pub async fn empty_cart(&self, user_id: &str) -> CartResult<()> {
        tracing::debug!("empty_cart called user={}", user_id);
        self.repo.empty_cart(user_id).await
    }

    pub async fn ping(&self) -> bool {
        self.repo.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CartItem;
    use crate::domain::errors::CartError;
    use crate::domain::value_objects::HostCandidate;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    // ===== Mocks =====

    struct MockCartRepo {
        rows: Mutex<HashMap<(String, String), i32>>,
        online: bool,
    }

    impl MockCartRepo {
        fn new(online: bool) -> Self {
            Self {
                rows: Mutex::new(HashMap::new()),
                online,
            }
        }

        fn check_online(&self) -> CartResult<()> {
            if self.online {
                Ok(())
            } else {
                Err(CartError::StorageUnavailable {
                    message: "can't access cart storage at mock:5432 (table carts): down"
                        .to_string(),
                })
            }
        }
    }

    #[async_trait]
    impl CartRepository for MockCartRepo {
        async fn add_item(&self, user_id: &str, product_id: &str, quantity: i32) -> CartResult<()> {
            self.check_online()?;
            *self
                .rows
                .lock()
                .unwrap()
                .entry((user_id.to_string(), product_id.to_string()))
                .or_insert(0) += quantity;
            Ok(())
        }

        async fn get_cart(&self, user_id: &str) -> CartResult<Cart> {
            self.check_online()?;
            let items = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|((u, _), _)| u == user_id)
                .map(|((_, p), q)| CartItem::new(p.clone(), *q))
                .collect();
            Ok(Cart {
                user_id: user_id.to_string(),
                items,
            })
        }

        async fn empty_cart(&self, user_id: &str) -> CartResult<()> {
            self.check_online()?;
            self.rows.lock().unwrap().retain(|(u, _), _| u != user_id);
            Ok(())
        }

        async fn ping(&self) -> bool {
            self.online
        }
    }

    // ===== Tests =====

    #[tokio::test]
    async fn test_add_then_get() {
        let service = CartService::new(Arc::new(MockCartRepo::new(true)), None);

        service.add_item("u1", "p1", 2).await.unwrap();
        service.add_item("u1", "p1", 3).await.unwrap();

        let cart = service.get_cart("u1").await.unwrap();
        assert_eq!(cart.user_id, "u1");
        assert_eq!(cart.items, vec![CartItem::new("p1", 5)]);
    }

    #[tokio::test]
    async fn test_empty_then_get() {
        let service = CartService::new(Arc::new(MockCartRepo::new(true)), None);

        service.add_item("u1", "p1", 2).await.unwrap();
        service.empty_cart("u1").await.unwrap();

        assert_eq!(service.get_cart("u1").await.unwrap(), Cart::empty("u1"));
    }

    #[tokio::test]
    async fn test_failures_propagate_as_storage_unavailable() {
        let service = CartService::new(Arc::new(MockCartRepo::new(false)), None);

        let err = service.get_cart("u1").await.unwrap_err();
        assert_eq!(err.kind().as_str(), "failed_precondition");
        assert!(service.add_item("u1", "p1", 1).await.is_err());
        assert!(service.empty_cart("u1").await.is_err());
        assert!(!service.ping().await);
    }

    #[tokio::test]
    async fn test_selected_host() {
        let selected = SelectedHost::new(HostCandidate::new("db-eu", 5432), Duration::from_millis(8));
        let service = CartService::new(Arc::new(MockCartRepo::new(true)), Some(selected.clone()));
        assert_eq!(service.selected_host(), Some(&selected));
        assert!(service.ping().await);
    }
}
