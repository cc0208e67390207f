use std::sync::Arc;

use keyward_application::{AccessRepository, AuthService, DocumentStore, TokenClaimsGate};
use keyward_core::AppError;
use keyward_infrastructure::{
    Argon2PasswordHasher, Ed25519TokenSigner, InMemoryDocumentStore, InMemoryTokenRegistry,
    JwtTokenVerifier, RedisDocumentStore,
};

use crate::api_config::{ApiConfig, DocumentStoreConfig};
use crate::bootstrap::ensure_admin_account;
use crate::state::AppState;

pub fn build_document_store(config: &ApiConfig) -> Result<Arc<dyn DocumentStore>, AppError> {
    match &config.document_store {
        DocumentStoreConfig::Memory => {
            tracing::warn!("using in-memory document store, accounts are lost on restart");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
        DocumentStoreConfig::Redis { url } => {
            let store =
                RedisDocumentStore::from_url(url, config.access_document_key.as_str())?;
            tracing::info!(key = store.key(), "using redis document store");
            Ok(Arc::new(store))
        }
    }
}

pub async fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let document_store = build_document_store(config)?;
    let access_repository =
        AccessRepository::load(document_store, Arc::new(Argon2PasswordHasher::new())).await?;

    if let Some(admin) = &config.admin_bootstrap {
        ensure_admin_account(&access_repository, admin).await?;
    }

    assemble_state(
        access_repository,
        config.token_issuer.as_str(),
        config.access_token_lifespan_seconds,
    )
}

/// Wires token issuance and the gate around a loaded repository.
pub fn assemble_state(
    access_repository: AccessRepository,
    token_issuer: &str,
    access_token_lifespan_seconds: i64,
) -> Result<AppState, AppError> {
    let signer = Arc::new(Ed25519TokenSigner::generate(token_issuer));
    let token_registry = Arc::new(InMemoryTokenRegistry::new(
        signer.clone(),
        access_token_lifespan_seconds,
    )?);
    let token_verifier = Arc::new(JwtTokenVerifier::new(signer.clone(), signer.issuer()));

    let token_claims_gate = TokenClaimsGate::new(
        token_registry.clone(),
        token_verifier,
        access_repository.clone(),
    );
    let auth_service = AuthService::new(
        access_repository.clone(),
        token_registry,
        token_claims_gate.clone(),
    );

    Ok(AppState {
        access_repository,
        token_claims_gate,
        auth_service,
    })
}
