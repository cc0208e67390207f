//! Application services and ports.

#![forbid(unsafe_code)]

mod access_context;
mod access_ports;
mod access_repository;
mod auth_service;
mod token_claims_gate;
mod token_ports;

pub use access_context::AccessContext;
pub use access_ports::{DocumentStore, PasswordHasher};
pub use access_repository::{AccessRepository, AccountInput, RoleInput};
pub use auth_service::{AuthService, LoginOutcome, TokenCheck};
pub use token_claims_gate::{TokenClaimsGate, extract_bearer_token};
pub use token_ports::{
    IssuedToken, SigningKeySource, TokenIntrospector, TokenIssuer, TokenVerifier, VerifiedClaims,
};
