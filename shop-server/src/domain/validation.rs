use crate::domain::error::{DomainError, FieldError};

pub const MIN_PASSWORD_LEN: usize = 6;
const MAX_EMAIL_LEN: usize = 254;

pub const INVALID_EMAIL: &str = "Enter a valid email address";
pub const SHORT_PASSWORD: &str = "Password must be at least 6 characters";

/// Trims and lower-cases an address before it is stored or looked up.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Structural address check: one `@`, non-empty local part, dotted domain
/// whose labels are non-empty, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return false;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(DomainError::Validation(vec![FieldError::new(
            "email",
            INVALID_EMAIL,
        )]))
    }
}

/// Checks an email/password pair, reporting every failing field at once.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), DomainError> {
    let mut errors = Vec::new();
    if !is_valid_email(email) {
        errors.push(FieldError::new("email", INVALID_EMAIL));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new("password", SHORT_PASSWORD));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("user.name+tag@domain.co.uk"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("@"));
        assert!(!is_valid_email("test@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("test@domain"));
        assert!(!is_valid_email("test@domain."));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("test"));
    }

    #[test]
    fn credentials_report_both_fields() {
        match validate_credentials("nope", "abc") {
            Err(DomainError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].msg, INVALID_EMAIL);
                assert_eq!(errors[1].msg, SHORT_PASSWORD);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn six_characters_is_enough() {
        assert!(validate_credentials("a@x.com", "abcdef").is_ok());
        assert!(validate_credentials("a@x.com", "abcde").is_err());
        // counted in characters, not bytes
        assert!(validate_credentials("a@x.com", "ééééé").is_err());
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
    }
}
