use std::sync::Arc;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::cart::Cart;
use crate::domain::error::DomainError;

#[derive(Clone)]
pub struct CartService {
    repo: Arc<dyn UserRepository>,
}

impl CartService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn add_item(&self, user_id: Uuid, item_id: u32) -> Result<Cart, DomainError> {
        let cart = self
            .repo
            .increment_cart_item(user_id, item_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;
        debug!(quantity = cart.quantity(item_id), "cart item added");
        Ok(cart)
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, user_id: Uuid, item_id: u32) -> Result<Cart, DomainError> {
        let cart = self
            .repo
            .decrement_cart_item(user_id, item_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;
        debug!(quantity = cart.quantity(item_id), "cart item removed");
        Ok(cart)
    }

    pub async fn get_cart(&self, user_id: Uuid) -> Result<Cart, DomainError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .map(|user| user.cart)
            .ok_or(DomainError::UserNotFound(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryUserRepository;
    use crate::domain::user::User;

    async fn with_user() -> (CartService, Uuid) {
        let repo = Arc::new(InMemoryUserRepository::default());
        let user = repo
            .create(User::new("a".into(), "a@x.com".into(), "hash".into()))
            .await
            .unwrap();
        (CartService::new(repo), user.id)
    }

    #[tokio::test]
    async fn add_and_remove_adjust_one_slot() {
        let (carts, user) = with_user().await;
        carts.add_item(user, 5).await.unwrap();
        carts.add_item(user, 5).await.unwrap();
        let cart = carts.remove_item(user, 5).await.unwrap();
        assert_eq!(cart.quantity(5), 1);
        assert_eq!(carts.get_cart(user).await.unwrap().quantity(5), 1);
    }

    #[tokio::test]
    async fn no_sequence_drives_a_slot_below_zero() {
        let (carts, user) = with_user().await;
        let ops = [false, false, true, false, false, true, true, false, false, false];
        let mut expected: u32 = 0;
        for add in ops {
            let cart = if add {
                expected += 1;
                carts.add_item(user, 12).await.unwrap()
            } else {
                expected = expected.saturating_sub(1);
                carts.remove_item(user, 12).await.unwrap()
            };
            assert_eq!(cart.quantity(12), expected);
        }
        let cart = carts.get_cart(user).await.unwrap();
        assert!(cart.iter().all(|(_, qty)| qty == 0));
    }

    #[tokio::test]
    async fn unknown_item_ids_are_accepted() {
        let (carts, user) = with_user().await;
        let cart = carts.add_item(user, 9_999).await.unwrap();
        assert_eq!(cart.quantity(9_999), 1);
        assert_eq!(cart.len(), 301);
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let (carts, _) = with_user().await;
        let ghost = Uuid::new_v4();
        assert!(matches!(
            carts.add_item(ghost, 1).await,
            Err(DomainError::UserNotFound(_))
        ));
        assert!(matches!(
            carts.get_cart(ghost).await,
            Err(DomainError::UserNotFound(_))
        ));
    }
}
