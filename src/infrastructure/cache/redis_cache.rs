//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Redis cache for short code lookups.
///
/// A single `ConnectionManager` is shared by all requests; it multiplexes
/// commands and reconnects on its own. Errors are returned to the caller.
pub struct RedisCache {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: "url:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let redis_key = self.build_key(key);
        let mut conn = self.client.clone();

        conn.get::<_, Option<String>>(&redis_key)
            .await
            .map_err(|e| CacheError::OperationError(format!("GET {}: {}", redis_key, e)))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()> {
        let redis_key = self.build_key(key);
        let mut conn = self.client.clone();

        let result = match ttl {
            Some(ttl) => {
                conn.set_ex::<_, _, ()>(&redis_key, value, ttl.as_secs().max(1))
                    .await
            }
            None => conn.set::<_, _, ()>(&redis_key, value).await,
        };

        result.map_err(|e| CacheError::OperationError(format!("SET {}: {}", redis_key, e)))?;
        debug!(key = %redis_key, ttl = ?ttl, "Cache SET");
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let redis_key = self.build_key(key);
        let mut conn = self.client.clone();

        let deleted = conn
            .del::<_, i32>(&redis_key)
            .await
            .map_err(|e| CacheError::OperationError(format!("DEL {}: {}", redis_key, e)))?;

        if deleted > 0 {
            debug!(key = %redis_key, "Cache DEL");
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
