use std::sync::Arc;

use tracing::instrument;

use crate::data::product_repository::ProductRepository;
use crate::domain::error::DomainError;
use crate::domain::product::{self, NewProduct, Product, WOMEN_CATEGORY};

#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self), fields(name = %new_product.name))]
    pub async fn add_product(&self, new_product: NewProduct) -> Result<Product, DomainError> {
        new_product.validate()?;
        self.repo.create(new_product).await
    }

    #[instrument(skip(self))]
    pub async fn remove_product(&self, id: i64) -> Result<Product, DomainError> {
        self.repo
            .delete(id)
            .await?
            .ok_or(DomainError::ProductNotFound(id))
    }

    pub async fn list_all(&self) -> Result<Vec<Product>, DomainError> {
        self.repo.list_all().await
    }

    pub async fn new_collection(&self) -> Result<Vec<Product>, DomainError> {
        Ok(product::new_collection(self.repo.list_all().await?))
    }

    pub async fn popular_in_women(&self) -> Result<Vec<Product>, DomainError> {
        Ok(product::short_list(
            self.repo.list_by_category(WOMEN_CATEGORY).await?,
        ))
    }

    pub async fn related_products(&self) -> Result<Vec<Product>, DomainError> {
        Ok(product::short_list(self.repo.list_all().await?))
    }
}
