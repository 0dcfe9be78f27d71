use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopClientError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Not found")]
    NotFound,
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

impl ShopClientError {
    pub(crate) async fn from_http_response(resp: reqwest::Response) -> Self {
        let status = resp.status();
        match resp.text().await {
            Ok(body) => Self::from_parts(status, &body),
            Err(err) => Self::Request(err),
        }
    }

    /// Maps a status and raw body onto the error variants.
    pub(crate) fn from_parts(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| message_of(&value))
            .unwrap_or_else(|| body.trim().to_string());

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::NOT_FOUND => Self::NotFound,
            s if s.is_success() || s == StatusCode::BAD_REQUEST => Self::Rejected(message),
            s => Self::Api {
                status: s.as_u16(),
                message,
            },
        }
    }
}

/// Pulls a human readable message out of a server error body.
///
/// The server uses `message`, `error` or `errors` depending on the endpoint;
/// `errors` is either a string or a list of field errors carrying `msg`.
pub(crate) fn message_of(value: &Value) -> Option<String> {
    for key in ["message", "error"] {
        if let Some(text) = value.get(key).and_then(Value::as_str) {
            return Some(text.to_string());
        }
    }
    match value.get("errors")? {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_codes_map_to_variants() {
        let err = ShopClientError::from_parts(
            StatusCode::UNAUTHORIZED,
            r#"{"errors":"Please authenticate using valid token"}"#,
        );
        assert!(matches!(err, ShopClientError::Unauthorized));

        let err = ShopClientError::from_parts(
            StatusCode::NOT_FOUND,
            r#"{"success":false,"message":"Product not found"}"#,
        );
        assert!(matches!(err, ShopClientError::NotFound));

        let err = ShopClientError::from_parts(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"success":false,"message":"Database error","error":"boom"}"#,
        );
        match err {
            ShopClientError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Database error");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn login_failures_are_rejections() {
        let err = ShopClientError::from_parts(
            StatusCode::OK,
            r#"{"success":false,"error":"Wrong Password"}"#,
        );
        match err {
            ShopClientError::Rejected(msg) => assert_eq!(msg, "Wrong Password"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn field_errors_are_joined() {
        let body = json!({
            "success": false,
            "errors": [
                { "type": "field", "msg": "Please enter a valid email", "path": "email", "location": "body" },
                { "type": "field", "msg": "Password must be at least 6 characters long", "path": "password", "location": "body" },
            ]
        });
        assert_eq!(
            message_of(&body).unwrap(),
            "Please enter a valid email; Password must be at least 6 characters long"
        );
        assert_eq!(
            message_of(&json!({ "errors": "Existing user found with the same email address" }))
                .unwrap(),
            "Existing user found with the same email address"
        );
    }

    #[test]
    fn non_json_bodies_are_passed_through() {
        match ShopClientError::from_parts(StatusCode::BAD_GATEWAY, "upstream down\n") {
            ShopClientError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
