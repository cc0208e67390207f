use async_trait::async_trait;

use keyward_core::AppResult;

/// Port for the external store holding the single access document.
///
/// The store offers no compare-and-swap or partial-write semantics; the
/// repository's rollback is the only consistency mechanism.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the stored document bytes, or `None` if it was never written.
    async fn get(&self) -> AppResult<Option<Vec<u8>>>;

    /// Replaces the stored document.
    async fn put(&self, document: Vec<u8>) -> AppResult<()>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext secret.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext secret against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
