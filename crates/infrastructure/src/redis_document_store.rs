//! Redis-backed access document store.

use async_trait::async_trait;
use keyward_application::DocumentStore;
use keyward_core::{AppError, AppResult};
use redis::AsyncCommands;

/// Redis implementation of the document store port. The whole document
/// lives under one key.
#[derive(Clone)]
pub struct RedisDocumentStore {
    client: redis::Client,
    key: String,
}

impl RedisDocumentStore {
    /// Creates a store with a configured Redis client and document key.
    #[must_use]
    pub fn new(client: redis::Client, key: impl Into<String>) -> Self {
        Self {
            client,
            key: key.into(),
        }
    }

    /// Creates a store from a Redis connection URL.
    pub fn from_url(redis_url: &str, key: impl Into<String>) -> AppResult<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|error| AppError::Internal(format!("invalid redis url: {error}")))?;
        Ok(Self::new(client, key))
    }

    /// Returns the key holding the document.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))
    }
}

#[async_trait]
impl DocumentStore for RedisDocumentStore {
    async fn get(&self) -> AppResult<Option<Vec<u8>>> {
        let mut connection = self.connection().await?;

        let document: Option<Vec<u8>> = connection.get(&self.key).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to read access document '{}': {error}",
                self.key
            ))
        })?;

        Ok(document)
    }

    async fn put(&self, document: Vec<u8>) -> AppResult<()> {
        let mut connection = self.connection().await?;

        connection
            .set(&self.key, document)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to write access document '{}': {error}",
                    self.key
                ))
            })
    }
}
