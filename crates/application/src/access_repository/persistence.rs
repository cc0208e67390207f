use keyward_core::AppError;
use keyward_domain::AccessDocument;

use super::*;

pub(super) async fn fetch_state(store: &dyn DocumentStore) -> AppResult<AccessState> {
    match store.get().await? {
        Some(bytes) => AccessDocument::from_bytes(&bytes).map(AccessState::from_document),
        None => Ok(AccessState::default()),
    }
}

impl AccessRepository {
    /// Runs one write under the exclusive lock.
    ///
    /// The lock is taken in the caller's future, so a caller dropped while
    /// waiting leaves the state untouched. Once held, the lock moves into a
    /// spawned task and mutation, persistence and rollback complete even if
    /// the caller goes away. `mutate` must validate before it changes
    /// anything; its errors are returned without persisting.
    pub(super) async fn write<T, F>(&self, operation: &'static str, mutate: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut AccessState) -> AppResult<T> + Send + 'static,
    {
        let mut guard = Arc::clone(&self.state).write_owned().await;
        let store = Arc::clone(&self.store);

        let task = tokio::spawn(async move {
            let state = &mut *guard;
            let value = mutate(state)?;
            persist_or_rollback(store.as_ref(), state, operation).await?;
            Ok(value)
        });

        task.await.map_err(|error| {
            AppError::Internal(format!("access write '{operation}' did not complete: {error}"))
        })?
    }
}

async fn persist_or_rollback(
    store: &dyn DocumentStore,
    state: &mut AccessState,
    operation: &'static str,
) -> AppResult<()> {
    let outcome = match state.to_document().to_bytes() {
        Ok(bytes) => store.put(bytes).await,
        Err(error) => Err(error),
    };

    let Err(error) = outcome else {
        tracing::debug!(operation, "access document persisted");
        return Ok(());
    };

    match fetch_state(store).await {
        Ok(reloaded) => {
            *state = reloaded;
            tracing::warn!(
                operation,
                error = %error,
                "access document write failed, cache reloaded from store"
            );
        }
        Err(rollback_error) => {
            tracing::error!(
                operation,
                error = %error,
                rollback_error = %rollback_error,
                "unable to roll back access cache"
            );
        }
    }

    Err(error)
}
