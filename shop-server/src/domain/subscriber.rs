use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscriber {
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}

impl Subscriber {
    pub fn new(email: String) -> Self {
        Self {
            email,
            subscribed_at: Utc::now(),
        }
    }
}
