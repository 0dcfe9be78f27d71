use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::cart::Cart;
use crate::domain::error::DomainError;
use crate::domain::user::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> Result<User, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    /// Adds one unit to a cart slot. `None` when the user does not exist.
    async fn increment_cart_item(
        &self,
        id: Uuid,
        item_id: u32,
    ) -> Result<Option<Cart>, DomainError>;
    /// Removes one unit from a cart slot holding at least one.
    /// `None` when the user does not exist.
    async fn decrement_cart_item(
        &self,
        id: Uuid,
        item_id: u32,
    ) -> Result<Option<Cart>, DomainError>;
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    cart_data: Json<Cart>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            cart: row.cart_data.0,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, cart_data, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Json(&user.cart))
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .and_then(|db| db.constraint())
                .map(|c| c.contains("users_email"))
                == Some(true)
            {
                DomainError::DuplicateEmail
            } else {
                error!("failed to create user: {}", e);
                DomainError::Store(e.to_string())
            }
        })?;

        info!(user_id = %user.id, email = %user.email, "user created");
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, cart_data, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(User::from))
        .map_err(|e| {
            error!("failed to find user by email {}: {}", email, e);
            DomainError::Store(e.to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, cart_data, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(User::from))
        .map_err(|e| {
            error!("failed to find user by id {}: {}", id, e);
            DomainError::Store(e.to_string())
        })
    }

    async fn increment_cart_item(
        &self,
        id: Uuid,
        item_id: u32,
    ) -> Result<Option<Cart>, DomainError> {
        // single statement: the row lock makes concurrent increments serialize
        sqlx::query_scalar::<_, Json<Cart>>(
            r#"
            UPDATE users
            SET cart_data = jsonb_set(
                cart_data,
                ARRAY[$2::text],
                to_jsonb(LEAST(COALESCE((cart_data ->> $2::text)::bigint, 0) + 1, 4294967295))
            )
            WHERE id = $1
            RETURNING cart_data
            "#,
        )
        .bind(id)
        .bind(item_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map(|cart| cart.map(|c| c.0))
        .map_err(|e| {
            error!("failed to add item {} for user {}: {}", item_id, id, e);
            DomainError::Store(e.to_string())
        })
    }

    async fn decrement_cart_item(
        &self,
        id: Uuid,
        item_id: u32,
    ) -> Result<Option<Cart>, DomainError> {
        sqlx::query_scalar::<_, Json<Cart>>(
            r#"
            UPDATE users
            SET cart_data = CASE
                WHEN COALESCE((cart_data ->> $2::text)::bigint, 0) > 0
                THEN jsonb_set(
                    cart_data,
                    ARRAY[$2::text],
                    to_jsonb((cart_data ->> $2::text)::bigint - 1)
                )
                ELSE cart_data
            END
            WHERE id = $1
            RETURNING cart_data
            "#,
        )
        .bind(id)
        .bind(item_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map(|cart| cart.map(|c| c.0))
        .map_err(|e| {
            error!("failed to remove item {} for user {}: {}", item_id, id, e);
            DomainError::Store(e.to_string())
        })
    }
}
