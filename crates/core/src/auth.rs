use serde::{Deserialize, Serialize};

/// Identity of an authenticated caller, resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    username: String,
    display_name: Option<String>,
    email: Option<String>,
}

impl UserIdentity {
    /// Creates a user identity from account data.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        display_name: Option<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            username: username.into(),
            display_name,
            email,
        }
    }

    /// Returns the unique account username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the display name, if the account has one.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns the email, if the account has one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
