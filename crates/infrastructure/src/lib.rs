//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod ed25519_token_signer;
mod in_memory_document_store;
mod in_memory_token_registry;
mod jwt_token_verifier;
mod redis_document_store;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use ed25519_token_signer::{Ed25519TokenSigner, TokenClaims};
pub use in_memory_document_store::InMemoryDocumentStore;
pub use in_memory_token_registry::InMemoryTokenRegistry;
pub use jwt_token_verifier::JwtTokenVerifier;
pub use redis_document_store::RedisDocumentStore;
