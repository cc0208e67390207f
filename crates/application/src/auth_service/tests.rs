use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use keyward_core::{AppError, AppResult};
use keyward_domain::{Permission, Scope};

use super::AuthService;
use crate::{
    AccessRepository, AccountInput, DocumentStore, IssuedToken, PasswordHasher,
    TokenClaimsGate, TokenIntrospector, TokenIssuer, TokenVerifier, VerifiedClaims,
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

/// Issues tokens shaped `signed.<subject>.<n>` and tracks which are active.
#[derive(Default)]
struct FakeTokens {
    active: Mutex<HashMap<String, String>>,
    issued: AtomicUsize,
}

#[async_trait]
impl TokenIssuer for FakeTokens {
    async fn issue(&self, subject: &str) -> AppResult<IssuedToken> {
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst);
        let token = format!("signed.{subject}.{sequence}");
        self.active
            .lock()
            .await
            .insert(token.clone(), subject.to_owned());
        Ok(IssuedToken {
            token,
            expires_at: 4_000_000_000,
        })
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        self.active.lock().await.remove(token);
        Ok(())
    }
}

#[async_trait]
impl TokenIntrospector for FakeTokens {
    async fn introspect(&self, token: &str) -> AppResult<String> {
        self.active
            .lock()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated("token inactive".to_owned()))
    }
}

impl TokenVerifier for FakeTokens {
    fn verify(&self, token: &str) -> AppResult<VerifiedClaims> {
        let subject = token
            .strip_prefix("signed.")
            .and_then(|rest| rest.rsplit_once('.'))
            .map(|(subject, _)| subject)
            .ok_or_else(|| AppError::Unauthenticated("bad signature".to_owned()))?;
        Ok(VerifiedClaims {
            subject: subject.to_owned(),
            expires_at: 4_000_000_000,
        })
    }
}

async fn service() -> AppResult<AuthService> {
    let repository = AccessRepository::load(
        Arc::new(FakeDocumentStore::default()),
        Arc::new(PlainPasswordHasher),
    )
    .await?;
    repository
        .create_account(AccountInput {
            username: "alice".to_owned(),
            password: Some("pw1".to_owned()),
            enabled: true,
            roles: vec!["administrator".to_owned()],
            pwd_update_required: true,
            ..AccountInput::default()
        })
        .await?;
    repository
        .create_account(AccountInput {
            username: "bob".to_owned(),
            password: Some("pw".to_owned()),
            enabled: false,
            ..AccountInput::default()
        })
        .await?;

    let tokens = Arc::new(FakeTokens::default());
    let gate = TokenClaimsGate::new(tokens.clone(), tokens.clone(), repository.clone());
    Ok(AuthService::new(repository, tokens, gate))
}

#[tokio::test]
async fn login_issues_token_with_permissions() -> AppResult<()> {
    let service = service().await?;

    let outcome = service.login("alice", "pw1").await?;

    assert_eq!(outcome.username, "alice");
    assert!(outcome.pwd_update_required);
    assert!(outcome.token.starts_with("signed.alice."));
    assert!(
        outcome
            .permissions
            .get(&Scope::User)
            .is_some_and(|granted| granted.contains(&Permission::Delete))
    );
    Ok(())
}

#[tokio::test]
async fn login_failures_are_indistinguishable() -> AppResult<()> {
    let service = service().await?;

    let outcomes = [
        service.login("alice", "wrong").await,
        service.login("nobody", "pw1").await,
        service.login("bob", "pw").await,
    ];

    let messages: Vec<String> = outcomes
        .into_iter()
        .map(|outcome| match outcome {
            Err(AppError::Unauthenticated(message)) => message,
            other => panic!("expected unauthenticated, got {other:?}"),
        })
        .collect();
    assert!(messages.windows(2).all(|pair| pair[0] == pair[1]));
    Ok(())
}

#[tokio::test]
async fn check_reports_valid_until_logout() -> AppResult<()> {
    let service = service().await?;
    let outcome = service.login("alice", "pw1").await?;

    let before = service.check(&outcome.token).await;
    assert!(before.valid);
    assert_eq!(before.username.as_deref(), Some("alice"));

    service.logout(&outcome.token).await?;

    let after = service.check(&outcome.token).await;
    assert!(!after.valid);
    assert!(after.username.is_none());
    assert!(after.permissions.is_empty());
    Ok(())
}

#[tokio::test]
async fn check_of_garbage_token_is_invalid_not_error() -> AppResult<()> {
    let service = service().await?;

    assert!(!service.check("").await.valid);
    assert!(!service.check("signed.alice.99").await.valid);
    Ok(())
}
