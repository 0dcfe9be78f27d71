use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Item id to quantity, as returned by `/getcart`.
pub type Cart = BTreeMap<u32, u32>;

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub category: String,
    pub new_price: f64,
    pub old_price: f64,
    pub date: DateTime<Utc>,
    pub available: bool,
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}) {:.2} (was {:.2})",
            self.id, self.name, self.category, self.new_price, self.old_price
        )?;
        if !self.available {
            write!(f, " unavailable")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub image: String,
    pub category: String,
    pub new_price: f64,
    pub old_price: f64,
}
