//! Ed25519 JWT signing.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ed25519_dalek::SigningKey;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use keyward_application::SigningKeySource;
use keyward_core::{AppError, AppResult};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

/// PKCS#8 v1 prefix for a raw 32 byte Ed25519 private key.
const PKCS8_ED25519_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04, 0x20,
];

/// Registered claims carried by every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Account username.
    pub sub: String,
    /// Issuer URL.
    pub iss: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Not-before, unix seconds.
    pub nbf: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
    /// Unique token id.
    pub jti: String,
}

/// Signs access tokens with an Ed25519 key held in memory.
#[derive(Clone)]
pub struct Ed25519TokenSigner {
    encoding_key: EncodingKey,
    public_key: String,
    issuer: String,
}

impl Ed25519TokenSigner {
    /// Creates a signer with a freshly generated key.
    #[must_use]
    pub fn generate(issuer: impl Into<String>) -> Self {
        Self::from_signing_key(&SigningKey::generate(&mut OsRng), issuer)
    }

    /// Creates a signer from an existing key.
    #[must_use]
    pub fn from_signing_key(signing_key: &SigningKey, issuer: impl Into<String>) -> Self {
        let mut pkcs8_der = PKCS8_ED25519_PREFIX.to_vec();
        pkcs8_der.extend_from_slice(&signing_key.to_bytes());

        Self {
            encoding_key: EncodingKey::from_ed_der(&pkcs8_der),
            public_key: URL_SAFE_NO_PAD.encode(signing_key.verifying_key().as_bytes()),
            issuer: issuer.into(),
        }
    }

    /// Returns the issuer placed in the `iss` claim.
    #[must_use]
    pub fn issuer(&self) -> &str {
        self.issuer.as_str()
    }

    /// Signs a token for the subject valid for `lifespan_seconds` from now.
    pub fn sign(&self, subject: &str, lifespan_seconds: i64) -> AppResult<(String, TokenClaims)> {
        let now = chrono::Utc::now().timestamp();
        let claims = TokenClaims {
            sub: subject.to_owned(),
            iss: self.issuer.clone(),
            iat: now,
            nbf: now,
            exp: now.saturating_add(lifespan_seconds),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        self.sign_claims(&claims).map(|token| (token, claims))
    }

    /// Signs arbitrary claims.
    pub fn sign_claims(&self, claims: &TokenClaims) -> AppResult<String> {
        jsonwebtoken::encode(&Header::new(Algorithm::EdDSA), claims, &self.encoding_key)
            .map_err(|error| AppError::Internal(format!("failed to sign access token: {error}")))
    }
}

impl SigningKeySource for Ed25519TokenSigner {
    fn current_signing_public_key(&self) -> AppResult<String> {
        Ok(self.public_key.clone())
    }
}
