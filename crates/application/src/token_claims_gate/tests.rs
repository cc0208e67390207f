use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use keyward_core::{AppError, AppResult};
use keyward_domain::{Permission, Scope};

use super::{TokenClaimsGate, extract_bearer_token};
use crate::{
    AccessRepository, AccountInput, DocumentStore, PasswordHasher, TokenIntrospector,
    TokenVerifier, VerifiedClaims,
};

#[derive(Default)]
struct FakeDocumentStore {
    document: Mutex<Option<Vec<u8>>>,
}

#[async_trait]
impl DocumentStore for FakeDocumentStore {
    async fn get(&self) -> AppResult<Option<Vec<u8>>> {
        Ok(self.document.lock().await.clone())
    }

    async fn put(&self, document: Vec<u8>) -> AppResult<()> {
        *self.document.lock().await = Some(document);
        Ok(())
    }
}

struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("plain:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("plain:{password}"))
    }
}

/// Active tokens map to their subject.
#[derive(Default)]
struct FakeIntrospector {
    active: HashMap<String, String>,
}

#[async_trait]
impl TokenIntrospector for FakeIntrospector {
    async fn introspect(&self, token: &str) -> AppResult<String> {
        self.active
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated("token inactive".to_owned()))
    }
}

/// Accepts tokens shaped `signed.<subject>`.
struct FakeVerifier;

impl TokenVerifier for FakeVerifier {
    fn verify(&self, token: &str) -> AppResult<VerifiedClaims> {
        let subject = token
            .strip_prefix("signed.")
            .ok_or_else(|| AppError::Unauthenticated("bad signature".to_owned()))?;
        Ok(VerifiedClaims {
            subject: subject.to_owned(),
            expires_at: i64::MAX,
        })
    }
}

async fn gate_with(active: &[(&str, &str)]) -> AppResult<TokenClaimsGate> {
    let repository = AccessRepository::load(
        Arc::new(FakeDocumentStore::default()),
        Arc::new(PlainPasswordHasher),
    )
    .await?;

    for (username, enabled) in [("alice", true), ("dora", false)] {
        repository
            .create_account(AccountInput {
                username: username.to_owned(),
                password: Some("pw".to_owned()),
                enabled,
                roles: vec!["administrator".to_owned()],
                ..AccountInput::default()
            })
            .await?;
    }

    let introspector = FakeIntrospector {
        active: active
            .iter()
            .map(|(token, subject)| ((*token).to_owned(), (*subject).to_owned()))
            .collect(),
    };

    Ok(TokenClaimsGate::new(
        Arc::new(introspector),
        Arc::new(FakeVerifier),
        repository,
    ))
}

#[test]
fn bearer_extraction_accepts_any_scheme_case() {
    assert_eq!(extract_bearer_token(Some("Bearer abc")).ok(), Some("abc"));
    assert_eq!(extract_bearer_token(Some("bearer  abc ")).ok(), Some("abc"));
    assert!(extract_bearer_token(None).is_err());
    assert!(extract_bearer_token(Some("Basic abc")).is_err());
    assert!(extract_bearer_token(Some("Bearer")).is_err());
    assert!(extract_bearer_token(Some("Bearer   ")).is_err());
}

#[tokio::test]
async fn bypassed_operations_skip_authentication() -> AppResult<()> {
    let gate = gate_with(&[]).await?;

    let context = gate.authenticate("login", None).await?;
    assert!(context.username().is_none());
    assert!(gate.authenticate("check", Some("garbage")).await.is_ok());
    assert!(gate.authenticate("list_users", None).await.is_err());
    Ok(())
}

#[tokio::test]
async fn custom_bypass_list_replaces_defaults() -> AppResult<()> {
    let gate = gate_with(&[]).await?.with_bypass_operations(["health"]);

    assert!(gate.is_bypassed("health"));
    assert!(!gate.is_bypassed("login"));
    Ok(())
}

#[tokio::test]
async fn valid_token_projects_account_permissions() -> AppResult<()> {
    let gate = gate_with(&[("signed.alice", "alice")]).await?;

    let context = gate
        .authenticate("list_users", Some("Bearer signed.alice"))
        .await?;

    assert_eq!(context.username(), Some("alice"));
    context.require(Scope::User, &[Permission::Read, Permission::Delete])?;
    Ok(())
}

#[tokio::test]
async fn every_stage_failure_is_generic_unauthenticated() -> AppResult<()> {
    let gate = gate_with(&[
        ("forged.alice", "alice"),
        ("signed.alice", "mallory"),
        ("signed.ghost", "ghost"),
        ("signed.dora", "dora"),
    ])
    .await?;

    let headers = [
        None,
        Some("Token signed.alice"),
        Some("Bearer not-registered"),
        Some("Bearer forged.alice"),
        Some("Bearer signed.alice"),
        Some("Bearer signed.ghost"),
        Some("Bearer signed.dora"),
    ];

    let mut messages = Vec::new();
    for header in headers {
        match gate.authenticate("get_user", header).await {
            Err(AppError::Unauthenticated(message)) => messages.push(message),
            other => panic!("expected unauthenticated for {header:?}, got {other:?}"),
        }
    }

    messages.dedup();
    assert_eq!(messages.len(), 1);
    Ok(())
}
