//! Process-local cache implementation.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| Instant::now() >= expires_at)
    }
}

/// In-memory cache backed by a `DashMap`.
///
/// Expired entries are dropped lazily when read. Suitable for tests and for
/// running a single instance without Redis.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    storage: DashMap<String, Entry>,
}

impl InMemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let Some(entry) = self.storage.get(key) else {
            return Ok(None);
        };

        if entry.is_expired() {
            drop(entry);
            self.storage.remove_if(key, |_, entry| entry.is_expired());
            return Ok(None);
        }

        Ok(Some(entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()> {
        let entry = Entry {
            value: value.to_owned(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.storage.insert(key.to_owned(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.storage.remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();

        cache
            .set("abc123", "https://example.com", None)
            .await
            .unwrap();

        let value = cache.get("abc123").await.unwrap();
        assert_eq!(value.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = InMemoryCache::new();

        assert!(cache.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = InMemoryCache::new();

        cache.set("abc123", "https://old.com", None).await.unwrap();
        cache.set("abc123", "https://new.com", None).await.unwrap();

        assert_eq!(
            cache.get("abc123").await.unwrap().as_deref(),
            Some("https://new.com")
        );
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = InMemoryCache::new();

        cache
            .set("abc123", "https://example.com", Some(Duration::ZERO))
            .await
            .unwrap();

        assert!(cache.get("abc123").await.unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_unexpired_entry_is_a_hit() {
        let cache = InMemoryCache::new();

        cache
            .set("abc123", "https://example.com", Some(Duration::from_secs(3600)))
            .await
            .unwrap();

        assert!(cache.get("abc123").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = InMemoryCache::new();

        cache
            .set("abc123", "https://example.com", None)
            .await
            .unwrap();
        cache.delete("abc123").await.unwrap();
        cache.delete("never-set").await.unwrap();

        assert!(cache.get("abc123").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_expiry_never_removes_a_fresh_write() {
        let cache = std::sync::Arc::new(InMemoryCache::new());

        for _ in 0..200 {
            cache
                .set("abc123", "https://stale.com", Some(Duration::ZERO))
                .await
                .unwrap();

            let reader = {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get("abc123").await })
            };
            let writer = {
                let cache = cache.clone();
                tokio::spawn(async move { cache.set("abc123", "https://fresh.com", None).await })
            };

            reader.await.unwrap().unwrap();
            writer.await.unwrap().unwrap();

            assert_eq!(
                cache.get("abc123").await.unwrap().as_deref(),
                Some("https://fresh.com")
            );
        }
    }
}
