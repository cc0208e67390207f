use async_trait::async_trait;

use keyward_core::AppResult;

/// Claims extracted from a bearer token whose signature has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    /// Subject the token was issued to.
    pub subject: String,
    /// Expiry as unix seconds.
    pub expires_at: i64,
}

/// Freshly issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded bearer token.
    pub token: String,
    /// Expiry as unix seconds.
    pub expires_at: i64,
}

/// Port for the token capability's introspection entry point.
#[async_trait]
pub trait TokenIntrospector: Send + Sync {
    /// Returns the subject of an active token. Expired, revoked or unknown
    /// tokens fail.
    async fn introspect(&self, token: &str) -> AppResult<String>;
}

/// Port for offline signature and time-bound claim validation.
pub trait TokenVerifier: Send + Sync {
    /// Verifies the token against the current signing key.
    fn verify(&self, token: &str) -> AppResult<VerifiedClaims>;
}

/// Port for issuing and revoking bearer tokens.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Issues a signed token for the subject and registers it as active.
    async fn issue(&self, subject: &str) -> AppResult<IssuedToken>;

    /// Revokes a previously issued token.
    async fn revoke(&self, token: &str) -> AppResult<()>;
}

/// Port exposing the public half of the active token signing key.
pub trait SigningKeySource: Send + Sync {
    /// Returns the current Ed25519 public key, base64url encoded without
    /// padding.
    fn current_signing_public_key(&self) -> AppResult<String>;
}
