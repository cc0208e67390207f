//! Process-local registry of issued access tokens.
//!
//! Tokens are keyed by their SHA-256 digest so raw bearer values never sit
//! in the map.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use keyward_application::{IssuedToken, TokenIntrospector, TokenIssuer};
use keyward_core::{AppError, AppResult};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::Ed25519TokenSigner;

#[derive(Debug, Clone)]
struct ActiveToken {
    subject: String,
    expires_at: i64,
}

/// Issues, introspects and revokes bearer tokens in memory.
pub struct InMemoryTokenRegistry {
    signer: Arc<Ed25519TokenSigner>,
    lifespan_seconds: i64,
    tokens: Mutex<HashMap<String, ActiveToken>>,
}

impl InMemoryTokenRegistry {
    /// Creates a registry issuing tokens valid for `lifespan_seconds`.
    pub fn new(signer: Arc<Ed25519TokenSigner>, lifespan_seconds: i64) -> AppResult<Self> {
        if lifespan_seconds <= 0 {
            return Err(AppError::InvalidArgument(
                "token lifespan must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            signer,
            lifespan_seconds,
            tokens: Mutex::new(HashMap::new()),
        })
    }
}

#[async_trait]
impl TokenIssuer for InMemoryTokenRegistry {
    async fn issue(&self, subject: &str) -> AppResult<IssuedToken> {
        let (token, claims) = self.signer.sign(subject, self.lifespan_seconds)?;
        let now = chrono::Utc::now().timestamp();

        let mut tokens = self.tokens.lock().await;
        tokens.retain(|_, active| active.expires_at > now);
        tokens.insert(
            hash_token(&token),
            ActiveToken {
                subject: claims.sub,
                expires_at: claims.exp,
            },
        );

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        if let Some(revoked) = self.tokens.lock().await.remove(&hash_token(token)) {
            tracing::info!(username = %revoked.subject, "access token revoked");
        }
        Ok(())
    }
}

#[async_trait]
impl TokenIntrospector for InMemoryTokenRegistry {
    async fn introspect(&self, token: &str) -> AppResult<String> {
        let key = hash_token(token);
        let mut tokens = self.tokens.lock().await;
        let active = tokens
            .get(&key)
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated("token is not active".to_owned()))?;

        if active.expires_at <= chrono::Utc::now().timestamp() {
            tokens.remove(&key);
            return Err(AppError::Unauthenticated("token has expired".to_owned()));
        }

        Ok(active.subject)
    }
}

fn hash_token(raw_token: &str) -> String {
    hex::encode(Sha256::digest(raw_token.as_bytes()))
}
