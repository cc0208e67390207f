//! Argon2id password hasher implementation.
//!
//! Defaults to the OWASP-recommended parameters m=19456 (19 MiB), t=2, p=1.

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use keyward_application::PasswordHasher as PasswordHasherPort;
use keyward_core::{AppError, AppResult};

const DEFAULT_MEMORY_KIB: u32 = 19456;
const DEFAULT_ITERATIONS: u32 = 2;
const DEFAULT_PARALLELISM: u32 = 1;

/// Argon2id account secret hasher.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with the recommended parameters.
    #[must_use]
    pub fn new() -> Self {
        let params = Params::new(DEFAULT_MEMORY_KIB, DEFAULT_ITERATIONS, DEFAULT_PARALLELISM, None)
            .unwrap_or_else(|_| Params::default());
        Self::from_params(params)
    }

    /// Creates a hasher with explicit cost parameters.
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> AppResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None).map_err(|error| {
            AppError::InvalidArgument(format!("invalid argon2 parameters: {error}"))
        })?;
        Ok(Self::from_params(params))
    }

    fn from_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|error| AppError::Internal(format!("failed to hash password: {error}")))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        // A stored value that is not a PHC string can never match.
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            tracing::warn!("stored password hash is not a valid PHC string");
            return Ok(false);
        };

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(AppError::Internal(format!(
                "password verification failed: {error}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use keyward_application::PasswordHasher as PasswordHasherPort;
    use keyward_core::AppResult;

    use super::Argon2PasswordHasher;

    fn cheap_hasher() -> AppResult<Argon2PasswordHasher> {
        Argon2PasswordHasher::with_params(1024, 1, 1)
    }

    #[test]
    fn hash_is_phc_encoded_and_salted() -> AppResult<()> {
        let hasher = cheap_hasher()?;

        let first = hasher.hash_password("pw1")?;
        let second = hasher.hash_password("pw1")?;

        assert!(first.starts_with("$argon2id$"));
        assert!(!first.contains("pw1"));
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn verify_accepts_only_the_original_secret() -> AppResult<()> {
        let hasher = cheap_hasher()?;
        let hash = hasher.hash_password("correct-password")?;

        assert!(hasher.verify_password("correct-password", &hash)?);
        assert!(!hasher.verify_password("wrong-password", &hash)?);
        Ok(())
    }

    #[test]
    fn malformed_stored_hash_never_verifies() -> AppResult<()> {
        let hasher = cheap_hasher()?;

        assert!(!hasher.verify_password("pw", "not-a-hash")?);
        assert!(!hasher.verify_password("", "")?);
        Ok(())
    }

    #[test]
    fn zero_iterations_are_rejected() {
        assert!(Argon2PasswordHasher::with_params(1024, 0, 1).is_err());
    }
}
