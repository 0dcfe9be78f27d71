use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};

use crate::domain::error::DomainError;
use crate::domain::subscriber::Subscriber;

#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    async fn create(&self, subscriber: Subscriber) -> Result<Subscriber, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, DomainError>;
    async fn list_all(&self) -> Result<Vec<Subscriber>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresSubscriberRepository {
    pool: PgPool,
}

impl PostgresSubscriberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberRepository for PostgresSubscriberRepository {
    async fn create(&self, subscriber: Subscriber) -> Result<Subscriber, DomainError> {
        sqlx::query("INSERT INTO subscribers (email, subscribed_at) VALUES ($1, $2)")
            .bind(&subscriber.email)
            .bind(subscriber.subscribed_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.as_database_error()
                    .map(|db| db.is_unique_violation())
                    .unwrap_or(false)
                {
                    DomainError::AlreadySubscribed
                } else {
                    error!("failed to create subscriber: {}", e);
                    DomainError::Store(e.to_string())
                }
            })?;

        info!(email = %subscriber.email, "subscriber added");
        Ok(subscriber)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, DomainError> {
        sqlx::query_as::<_, Subscriber>(
            "SELECT email, subscribed_at FROM subscribers WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find subscriber {}: {}", email, e);
            DomainError::Store(e.to_string())
        })
    }

    async fn list_all(&self) -> Result<Vec<Subscriber>, DomainError> {
        sqlx::query_as::<_, Subscriber>(
            "SELECT email, subscribed_at FROM subscribers ORDER BY subscribed_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching subscribers: {}", e);
            DomainError::Store(e.to_string())
        })
    }
}
