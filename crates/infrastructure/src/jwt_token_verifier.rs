//! Offline JWT verification against the current signing key.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use keyward_application::{SigningKeySource, TokenVerifier, VerifiedClaims};
use keyward_core::{AppError, AppResult};

use crate::TokenClaims;

/// Verifies EdDSA signed tokens and their time and issuer claims.
#[derive(Clone)]
pub struct JwtTokenVerifier {
    key_source: Arc<dyn SigningKeySource>,
    validation: Validation,
}

impl JwtTokenVerifier {
    /// Creates a verifier accepting only tokens from `issuer`.
    #[must_use]
    pub fn new(key_source: Arc<dyn SigningKeySource>, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);

        Self {
            key_source,
            validation,
        }
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn verify(&self, token: &str) -> AppResult<VerifiedClaims> {
        let public_key = self.key_source.current_signing_public_key()?;
        let decoding_key = DecodingKey::from_ed_components(&public_key).map_err(|error| {
            AppError::Internal(format!("invalid token signing public key: {error}"))
        })?;

        let token_data = jsonwebtoken::decode::<TokenClaims>(token, &decoding_key, &self.validation)
            .map_err(|error| {
                AppError::Unauthenticated(format!("token verification failed: {error}"))
            })?;

        Ok(VerifiedClaims {
            subject: token_data.claims.sub,
            expires_at: token_data.claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use keyward_application::TokenVerifier;
    use keyward_core::{AppError, AppResult};

    use super::JwtTokenVerifier;
    use crate::{Ed25519TokenSigner, TokenClaims};

    const ISSUER: &str = "http://localhost:9969";

    fn claims(subject: &str, nbf_offset: i64, exp_offset: i64) -> TokenClaims {
        let now = chrono::Utc::now().timestamp();
        TokenClaims {
            sub: subject.to_owned(),
            iss: ISSUER.to_owned(),
            iat: now,
            nbf: now + nbf_offset,
            exp: now + exp_offset,
            jti: "test".to_owned(),
        }
    }

    #[test]
    fn token_from_current_key_verifies() -> AppResult<()> {
        let signer = Arc::new(Ed25519TokenSigner::generate(ISSUER));
        let verifier = JwtTokenVerifier::new(signer.clone(), ISSUER);

        let (token, issued) = signer.sign("alice", 300)?;
        let verified = verifier.verify(&token)?;

        assert_eq!(verified.subject, "alice");
        assert_eq!(verified.expires_at, issued.exp);
        Ok(())
    }

    #[test]
    fn token_from_another_key_is_rejected() -> AppResult<()> {
        let signer = Arc::new(Ed25519TokenSigner::generate(ISSUER));
        let impostor = Ed25519TokenSigner::generate(ISSUER);
        let verifier = JwtTokenVerifier::new(signer, ISSUER);

        let (token, _) = impostor.sign("alice", 300)?;

        assert!(matches!(
            verifier.verify(&token),
            Err(AppError::Unauthenticated(_))
        ));
        Ok(())
    }

    #[test]
    fn expired_and_not_yet_valid_tokens_are_rejected() -> AppResult<()> {
        let signer = Arc::new(Ed25519TokenSigner::generate(ISSUER));
        let verifier = JwtTokenVerifier::new(signer.clone(), ISSUER);

        let expired = signer.sign_claims(&claims("alice", -600, -300))?;
        let premature = signer.sign_claims(&claims("alice", 300, 600))?;

        assert!(verifier.verify(&expired).is_err());
        assert!(verifier.verify(&premature).is_err());
        Ok(())
    }

    #[test]
    fn foreign_issuer_is_rejected() -> AppResult<()> {
        let signer = Arc::new(Ed25519TokenSigner::generate("https://elsewhere.example"));
        let verifier = JwtTokenVerifier::new(signer.clone(), ISSUER);

        let (token, _) = signer.sign("alice", 300)?;

        assert!(verifier.verify(&token).is_err());
        Ok(())
    }

    #[test]
    fn garbage_is_rejected() {
        let verifier = JwtTokenVerifier::new(Arc::new(Ed25519TokenSigner::generate(ISSUER)), ISSUER);
        assert!(verifier.verify("not.a.jwt").is_err());
    }
}
