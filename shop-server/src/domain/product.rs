use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, FieldError};

/// Category the "popular in women" view is drawn from.
pub const WOMEN_CATEGORY: &str = "women";

const NEW_COLLECTION_SIZE: usize = 8;
const SHORT_LIST_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub category: String,
    pub new_price: f64,
    pub old_price: f64,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
    pub available: bool,
}

/// Catalog entry before an id has been assigned.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub image: String,
    pub category: String,
    pub new_price: f64,
    pub old_price: f64,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), DomainError> {
        let errors: Vec<FieldError> = [
            ("name", &self.name),
            ("image", &self.image),
            ("category", &self.category),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(path, _)| FieldError::new(path, format!("{path} is required")))
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(errors))
        }
    }

    pub fn with_id(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            image: self.image,
            category: self.category,
            new_price: self.new_price,
            old_price: self.old_price,
            created_at: Utc::now(),
            available: true,
        }
    }
}

/// Id for the next product given the current maximum (1 for an empty catalog).
pub fn next_product_id(current_max: Option<i64>) -> i64 {
    current_max.map_or(1, |max| max + 1)
}

/// Everything but the oldest product, then the newest eight of those.
pub fn new_collection(products: Vec<Product>) -> Vec<Product> {
    let rest: Vec<Product> = products.into_iter().skip(1).collect();
    let start = rest.len().saturating_sub(NEW_COLLECTION_SIZE);
    rest.into_iter().skip(start).collect()
}

/// First four entries in storage order.
pub fn short_list(products: Vec<Product>) -> Vec<Product> {
    products.into_iter().take(SHORT_LIST_SIZE).collect()
}
