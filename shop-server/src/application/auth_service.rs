use std::sync::Arc;

use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::User;
use crate::domain::validation::{normalize_email, validate_credentials};
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    /// Resolves a session token to the user id it was issued for.
    pub fn authenticate(&self, token: &str) -> Result<Uuid, DomainError> {
        self.keys
            .verify_token(token)
            .map_err(|_| DomainError::Unauthenticated)
    }

    /// Creates an account with a seeded cart and returns a session token.
    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        name: String,
        email: &str,
        password: String,
    ) -> Result<String, DomainError> {
        let email = normalize_email(email);
        validate_credentials(&email, &password)?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(DomainError::DuplicateEmail);
        }

        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|err| DomainError::Internal(err.to_string()))?
            .map_err(|err| DomainError::Internal(err.to_string()))?;

        let user = self.repo.create(User::new(name, email, hash)).await?;
        info!(user_id = %user.id, "user signed up");
        self.issue(user.id)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, DomainError> {
        let email = normalize_email(email);
        validate_credentials(&email, password)?;

        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::UnknownEmail)?;

        let password = password.to_owned();
        let stored = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|err| DomainError::Internal(err.to_string()))?
            .map_err(|err| {
                error!(user_id = %user.id, error = %err, "stored password hash is unreadable");
                DomainError::Internal(err.to_string())
            })?;
        if !valid {
            return Err(DomainError::WrongPassword);
        }

        info!(user_id = %user.id, "user logged in");
        self.issue(user.id)
    }

    fn issue(&self, user_id: Uuid) -> Result<String, DomainError> {
        self.keys
            .generate_token(user_id)
            .map_err(|err| DomainError::Internal(err.to_string()))
    }
}
