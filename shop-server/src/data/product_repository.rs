use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};

use crate::domain::error::DomainError;
use crate::domain::product::{NewProduct, Product, next_product_id};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Stores the product under `max(id) + 1`.
    async fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    /// Deletes and returns the product, `None` if no such id.
    async fn delete(&self, id: i64) -> Result<Option<Product>, DomainError>;
    /// Whole catalog in ascending id order.
    async fn list_all(&self) -> Result<Vec<Product>, DomainError>;
    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut tx = self.pool.begin().await?;

        // blocks other writers until commit so two inserts never read the same max
        sqlx::query("LOCK TABLE products IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let max_id: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM products")
            .fetch_one(&mut *tx)
            .await?;
        let product = product.with_id(next_product_id(max_id));

        sqlx::query(
            r#"
            INSERT INTO products (id, name, image, category, new_price, old_price, created_at, available)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.image)
        .bind(&product.category)
        .bind(product.new_price)
        .bind(product.old_price)
        .bind(product.created_at)
        .bind(product.available)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("failed to create product: {}", e);
            DomainError::Store(e.to_string())
        })?;

        tx.commit().await?;

        info!(product_id = product.id, name = %product.name, "product created");
        Ok(product)
    }

    async fn delete(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let deleted = sqlx::query_as::<_, Product>(
            r#"
            DELETE FROM products
            WHERE id = $1
            RETURNING id, name, image, category, new_price, old_price, created_at, available
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to delete product {}: {}", id, e);
            DomainError::Store(e.to_string())
        })?;

        if deleted.is_some() {
            info!(product_id = id, "product deleted");
        }
        Ok(deleted)
    }

    async fn list_all(&self) -> Result<Vec<Product>, DomainError> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, image, category, new_price, old_price, created_at, available
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching products: {}", e);
            DomainError::Store(e.to_string())
        })
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, DomainError> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, image, category, new_price, old_price, created_at, available
            FROM products
            WHERE category = $1
            ORDER BY id
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching category {}: {}", category, e);
            DomainError::Store(e.to_string())
        })
    }
}
