use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("Existing user found with the same email address")]
    DuplicateEmail,
    #[error("Email is already subscribed")]
    AlreadySubscribed,
    #[error("No file uploaded")]
    NoFileUploaded,
    #[error("invalid upload: {0}")]
    Upload(String),
    #[error("Wrong Email Id")]
    UnknownEmail,
    #[error("Wrong Password")]
    WrongPassword,
    #[error("Please authenticate using valid token")]
    Unauthenticated,
    #[error("Product not found")]
    ProductNotFound(i64),
    #[error("user not found: {0}")]
    UserNotFound(Uuid),
    #[error("database error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Store(err.to_string())
    }
}

/// A single rejected input field, shaped like the entries clients already
/// parse: `{ "type": "field", "msg": ..., "path": ..., "location": "body" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub msg: String,
    pub path: String,
    pub location: &'static str,
}

impl FieldError {
    pub fn new(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            kind: "field",
            msg: msg.into(),
            path: path.into(),
            location: "body",
        }
    }
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Validation(_)
            | DomainError::DuplicateEmail
            | DomainError::AlreadySubscribed
            | DomainError::NoFileUploaded
            | DomainError::Upload(_) => StatusCode::BAD_REQUEST,
            // login failures travel as a 200 with `success: false`
            DomainError::UnknownEmail | DomainError::WrongPassword => StatusCode::OK,
            DomainError::Unauthenticated => StatusCode::UNAUTHORIZED,
            DomainError::ProductNotFound(_) | DomainError::UserNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            DomainError::Store(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            DomainError::Validation(errors) => json!({ "success": false, "errors": errors }),
            DomainError::DuplicateEmail => {
                json!({ "success": false, "errors": self.to_string() })
            }
            DomainError::UnknownEmail | DomainError::WrongPassword => {
                json!({ "success": false, "error": self.to_string() })
            }
            DomainError::Unauthenticated => json!({ "errors": self.to_string() }),
            DomainError::Store(message) => {
                error!(error = %message, "store error");
                json!({ "success": false, "message": "Database error", "error": message })
            }
            DomainError::Internal(message) => {
                error!(error = %message, "internal error");
                json!({ "success": false, "message": "Internal server error" })
            }
            DomainError::AlreadySubscribed
            | DomainError::NoFileUploaded
            | DomainError::Upload(_)
            | DomainError::ProductNotFound(_)
            | DomainError::UserNotFound(_) => {
                json!({ "success": false, "message": self.to_string() })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
