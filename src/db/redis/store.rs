use redis::AsyncCommands;
use redis::Client;

use crate::db::BlobStore;
use crate::error::AppResult;

/// Creates a Redis client for history storage
///
/// The client is lazy; no connection is made until the first command.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// History blobs stored as plain Redis strings without expiry
#[derive(Clone)]
pub struct RedisBlobStore {
    redis_client: Client,
}

impl RedisBlobStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }
}

#[async_trait::async_trait]
impl BlobStore for RedisBlobStore {
    /// Retrieves the blob stored under `key`, or `None` if the key is absent
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    /// Replaces the blob stored under `key`
    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(key, value).await?;
        tracing::debug!(key = %key, "History blob written to Redis");
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

// These tests need a running Redis server: cargo test -- --ignored
