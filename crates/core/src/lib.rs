//! Shared primitives for all Rust crates in Keyward.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::UserIdentity;

/// Result type used across Keyward crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input, violated invariant or broken reference.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation collides with an existing resource.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Caller could not be authenticated.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Caller is authenticated but blocked by authorization policy.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns a stable reason code for this error category.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "InvalidArg",
            Self::NotFound(_) => "NotFound",
            Self::AlreadyExists(_) => "AlreadyExists",
            Self::Unauthenticated(_) => "Unauthenticated",
            Self::AccessDenied(_) => "AccessDenied",
            Self::Internal(_) => "InternalError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn non_empty_string_keeps_value() {
        let value = NonEmptyString::new("alice").map(String::from);
        assert_eq!(value.ok().as_deref(), Some("alice"));
    }

    #[test]
    fn error_reason_is_stable() {
        assert_eq!(
            AppError::AccessDenied("missing".to_owned()).reason(),
            "AccessDenied"
        );
    }
}
