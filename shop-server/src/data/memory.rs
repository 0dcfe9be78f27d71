//! In-process repositories used by the test suites.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::data::product_repository::ProductRepository;
use crate::data::subscriber_repository::SubscriberRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::cart::Cart;
use crate::domain::error::DomainError;
use crate::domain::product::{NewProduct, Product, next_product_id};
use crate::domain::subscriber::Subscriber;
use crate::domain::user::User;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn update_cart(&self, id: Uuid, apply: impl FnOnce(&mut Cart)) -> Option<Cart> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&id)?;
        apply(&mut user.cart);
        Some(user.cart.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::DuplicateEmail);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn increment_cart_item(
        &self,
        id: Uuid,
        item_id: u32,
    ) -> Result<Option<Cart>, DomainError> {
        Ok(self.update_cart(id, |cart| {
            cart.add(item_id);
        }))
    }

    async fn decrement_cart_item(
        &self,
        id: Uuid,
        item_id: u32,
    ) -> Result<Option<Cart>, DomainError> {
        Ok(self.update_cart(id, |cart| {
            cart.remove(item_id);
        }))
    }
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Mutex<Vec<Product>>,
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut products = self.products.lock().unwrap();
        let max_id = products.iter().map(|p| p.id).max();
        let product = product.with_id(next_product_id(max_id));
        products.push(product.clone());
        Ok(product)
    }

    async fn delete(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let mut products = self.products.lock().unwrap();
        Ok(products
            .iter()
            .position(|p| p.id == id)
            .map(|index| products.remove(index)))
    }

    async fn list_all(&self) -> Result<Vec<Product>, DomainError> {
        let mut products = self.products.lock().unwrap().clone();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|p| p.category == category)
            .collect())
    }
}

#[derive(Default)]
pub struct InMemorySubscriberRepository {
    subscribers: Mutex<Vec<Subscriber>>,
}

#[async_trait]
impl SubscriberRepository for InMemorySubscriberRepository {
    async fn create(&self, subscriber: Subscriber) -> Result<Subscriber, DomainError> {
        let mut subscribers = self.subscribers.lock().unwrap();
        if subscribers.iter().any(|s| s.email == subscriber.email) {
            return Err(DomainError::AlreadySubscribed);
        }
        subscribers.push(subscriber.clone());
        Ok(subscriber)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, DomainError> {
        let subscribers = self.subscribers.lock().unwrap();
        Ok(subscribers.iter().find(|s| s.email == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Subscriber>, DomainError> {
        Ok(self.subscribers.lock().unwrap().clone())
    }
}
