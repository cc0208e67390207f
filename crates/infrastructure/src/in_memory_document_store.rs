//! Process-local document store.

use async_trait::async_trait;
use keyward_application::DocumentStore;
use keyward_core::AppResult;
use tokio::sync::RwLock;

/// Document store kept in memory. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    document: RwLock<Option<Vec<u8>>>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a document.
    #[must_use]
    pub fn with_document(document: Vec<u8>) -> Self {
        Self {
            document: RwLock::new(Some(document)),
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self) -> AppResult<Option<Vec<u8>>> {
        Ok(self.document.read().await.clone())
    }

    async fn put(&self, document: Vec<u8>) -> AppResult<()> {
        *self.document.write().await = Some(document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use keyward_application::DocumentStore;
    use keyward_core::AppResult;

    use super::InMemoryDocumentStore;

    #[tokio::test]
    async fn never_written_store_returns_none() -> AppResult<()> {
        assert!(InMemoryDocumentStore::new().get().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn put_replaces_previous_document() -> AppResult<()> {
        let store = InMemoryDocumentStore::with_document(b"first".to_vec());

        store.put(b"second".to_vec()).await?;

        assert_eq!(store.get().await?, Some(b"second".to_vec()));
        Ok(())
    }
}
