//! User domain model.
//!
//! # Responsibility
//! - Define the user record persisted by `UserRepository`.
//! - Own username/email/password field constraints.
//!
//! # Invariants
//! - `username` and `email` are unique across all users.
//! - Once persisted, `password` holds a one-way hash, never clear text.
//! - `password` is never serialized outward.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("valid email regex")
});

/// Storage-assigned user identifier.
pub type UserId = i64;

/// Canonical user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// `None` until the user has been saved.
    pub id: Option<UserId>,
    pub username: String,
    pub email: String,
    /// Clear text on input to `add_user`, hash everywhere else.
    #[serde(skip_serializing)]
    pub password: String,
}

/// Field-level validation failures for [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    BlankUsername,
    BlankEmail,
    InvalidEmail(String),
    BlankPassword,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankUsername => write!(f, "username must not be blank"),
            Self::BlankEmail => write!(f, "email must not be blank"),
            Self::InvalidEmail(value) => write!(f, "email is not valid: `{value}`"),
            Self::BlankPassword => write!(f, "password must not be blank"),
        }
    }
}

impl Error for UserValidationError {}

impl User {
    /// Creates an unsaved user carrying a clear-text password.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Checks field constraints before any storage access.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.username.trim().is_empty() {
            return Err(UserValidationError::BlankUsername);
        }
        validate_email(&self.email)?;
        if self.password.trim().is_empty() {
            return Err(UserValidationError::BlankPassword);
        }
        Ok(())
    }
}

/// Validates a lookup/input email: non-blank and `local@domain.tld` shaped.
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.trim().is_empty() {
        return Err(UserValidationError::BlankEmail);
    }
    if !is_valid_email(email) {
        return Err(UserValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

/// Returns whether `value` is `local-part "@" domain` with a dotted domain.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::{is_valid_email, User, UserValidationError};

    #[test]
    fn email_format_accepts_dotted_domain() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("jane.doe+tag@mail.example.co"));
    }

    #[test]
    fn email_format_rejects_malformed_values() {
        for value in [
            "jane",
            "jane@",
            "@example.com",
            "jane@example",
            "jane@example.",
            "jane@.com",
            "jane@@example.com",
            "jane doe@example.com",
        ] {
            assert!(!is_valid_email(value), "{value} should be rejected");
        }
    }

    #[test]
    fn validate_reports_first_failing_field() {
        let user = User::new(" ", "bad", "");
        assert_eq!(user.validate(), Err(UserValidationError::BlankUsername));

        let user = User::new("jane", "bad", "");
        assert_eq!(
            user.validate(),
            Err(UserValidationError::InvalidEmail("bad".to_string()))
        );

        let user = User::new("jane", "jane@example.com", "  ");
        assert_eq!(user.validate(), Err(UserValidationError::BlankPassword));
    }

    #[test]
    fn password_is_not_serialized() {
        let user = User::new("jane", "jane@example.com", "$argon2id$v=19$...");
        let json = serde_json::to_value(&user).expect("serialize user");
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "jane");
    }

    #[test]
    fn password_is_accepted_on_deserialize() {
        let user: User = serde_json::from_str(
            r#"{"id":null,"username":"jane","email":"jane@example.com","password":"s3cret"}"#,
        )
        .expect("deserialize user");
        assert_eq!(user.password, "s3cret");
    }
}
