//! Short link creation, resolution and statistics.
//!
//! [`LinkService`] coordinates the code generator, the fast cache and the
//! durable store using cache-aside:
//!
//! - **create**: dedup lookup in the store, mint a code, insert, then
//!   populate the cache
//! - **resolve**: cache first, store on miss (repopulating the cache), then
//!   count the click in the store
//! - **stats**: store only
//!
//! The two dependencies fail independently. A cache failure on read is a
//! miss and on write is logged; a store failure always reaches the caller.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::ShortLink;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::CodeGenerator;

/// Coordinates short link operations across the cache and the store.
///
/// Holds only shared handles, so one instance serves any number of
/// concurrent requests without locking.
pub struct LinkService<L: LinkRepository + ?Sized = dyn LinkRepository> {
    link_repository: Arc<L>,
    cache: Arc<dyn CacheService>,
    code_generator: Arc<dyn CodeGenerator>,
    cache_ttl: Option<Duration>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    ///
    /// `cache_ttl` is applied to every cache entry the service writes;
    /// `None` leaves expiry to the cache's own eviction policy.
    pub fn new(
        link_repository: Arc<L>,
        cache: Arc<dyn CacheService>,
        code_generator: Arc<dyn CodeGenerator>,
        cache_ttl: Option<Duration>,
    ) -> Self {
        Self {
            link_repository,
            cache,
            code_generator,
            cache_ttl,
        }
    }

    /// Returns the short link for `long_url`, creating it if needed.
    ///
    /// # Deduplication
    ///
    /// If a link for the same URL already exists it is returned unchanged,
    /// click count included, and nothing is written. Two concurrent calls for
    /// a new URL may both create a link; later calls return the older one.
    ///
    /// # Collisions
    ///
    /// A freshly generated code is not checked before insert. If it is taken
    /// the store rejects it and this returns a retryable
    /// [`AppError::Storage`]; the code is not regenerated here.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the lookup or the insert fails.
    /// Cache population failures are logged and do not fail the call.
    pub async fn create(&self, long_url: &str) -> Result<ShortLink, AppError> {
        if let Some(existing) = self.link_repository.find_by_long_url(long_url).await? {
            debug!(code = %existing.short_code, "Returning existing short link");
            return Ok(existing);
        }

        let link = ShortLink::new(self.code_generator.generate(), long_url.to_owned());

        self.link_repository.insert(&link).await?;
        info!(code = %link.short_code, "Created short link");

        self.populate_cache(&link.short_code, &link.long_url).await;

        Ok(link)
    }

    /// Resolves a short code to its long URL and counts the click.
    ///
    /// # Flow
    ///
    /// 1. Look the code up in the cache; a hit skips the store lookup
    /// 2. On a miss (or cache error), read the store and re-warm the cache
    /// 3. Increment the click count in the store
    ///
    /// Every successful call increments exactly once, before returning.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown; no click is
    /// counted. Returns [`AppError::Storage`] if the store lookup or the
    /// increment fails.
    pub async fn resolve_url(&self, short_code: &str) -> Result<String, AppError> {
        let long_url = match self.lookup_cache(short_code).await {
            Some(cached_url) => cached_url,
            None => {
                let link = self
                    .link_repository
                    .find_by_code(short_code)
                    .await?
                    .ok_or_else(|| not_found(short_code))?;

                self.populate_cache(&link.short_code, &link.long_url).await;
                link.long_url
            }
        };

        self.link_repository.increment_clicks(short_code, 1).await?;

        Ok(long_url)
    }

    /// Returns the authoritative record for a short code.
    ///
    /// Reads the store directly. Never touches the cache and never counts a
    /// click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    /// Returns [`AppError::Storage`] on store failures.
    pub async fn get_stats(&self, short_code: &str) -> Result<ShortLink, AppError> {
        self.link_repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| not_found(short_code))
    }

    /// Reads the cache, downgrading any error to a miss.
    async fn lookup_cache(&self, short_code: &str) -> Option<String> {
        match self.cache.get(short_code).await {
            Ok(Some(url)) => {
                debug!(code = %short_code, "Cache HIT");
                counter!("link_cache_hits_total").increment(1);
                Some(url)
            }
            Ok(None) => {
                debug!(code = %short_code, "Cache MISS");
                counter!("link_cache_misses_total").increment(1);
                None
            }
            Err(e) => {
                warn!(code = %short_code, error = %e, "Cache read failed, falling back to store");
                counter!("link_cache_errors_total", "op" => "get").increment(1);
                None
            }
        }
    }

    /// Writes `short_code -> long_url` to the cache, logging failures.
    async fn populate_cache(&self, short_code: &str, long_url: &str) {
        if let Err(e) = self.cache.set(short_code, long_url, self.cache_ttl).await {
            warn!(code = %short_code, error = %e, "Cache write failed");
            counter!("link_cache_errors_total", "op" => "set").increment(1);
        }
    }
}

fn not_found(short_code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": short_code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::{CacheError, MockCacheService};
    use crate::utils::code_generator::MockCodeGenerator;

    fn test_link(code: &str, url: &str, clicks: i64) -> ShortLink {
        let mut link = ShortLink::new(code.to_string(), url.to_string());
        link.click_count = clicks;
        link
    }

    fn fixed_generator(code: &'static str) -> MockCodeGenerator {
        let mut generator = MockCodeGenerator::new();
        generator
            .expect_generate()
            .returning(move || code.to_string());
        generator
    }

    fn service(
        repo: MockLinkRepository,
        cache: MockCacheService,
        generator: MockCodeGenerator,
    ) -> LinkService<MockLinkRepository> {
        LinkService::new(
            Arc::new(repo),
            Arc::new(cache),
            Arc::new(generator),
            Some(Duration::from_secs(60)),
        )
    }

    #[tokio::test]
    async fn test_create_persists_then_caches() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockCacheService::new();
        let mut seq = mockall::Sequence::new();

        repo.expect_find_by_long_url()
            .withf(|url| url == "https://a.example/x")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|link| {
                link.short_code == "K1abcd"
                    && link.long_url == "https://a.example/x"
                    && link.click_count == 0
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        cache
            .expect_set()
            .withf(|key, value, ttl| {
                key == "K1abcd"
                    && value == "https://a.example/x"
                    && *ttl == Some(Duration::from_secs(60))
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));

        let service = service(repo, cache, fixed_generator("K1abcd"));

        let link = service.create("https://a.example/x").await.unwrap();

        assert_eq!(link.short_code, "K1abcd");
        assert_eq!(link.long_url, "https://a.example/x");
        assert_eq!(link.click_count, 0);
    }

    #[tokio::test]
    async fn test_create_returns_existing_link_unchanged() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockCacheService::new();
        let mut generator = MockCodeGenerator::new();

        let existing = test_link("old123", "https://a.example/x", 7);
        let returned = existing.clone();
        repo.expect_find_by_long_url()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        repo.expect_insert().times(0);
        repo.expect_increment_clicks().times(0);
        cache.expect_set().times(0);
        generator.expect_generate().times(0);

        let service = service(repo, cache, generator);

        let link = service.create("https://a.example/x").await.unwrap();

        assert_eq!(link, existing);
        assert_eq!(link.click_count, 7);
    }

    #[tokio::test]
    async fn test_create_insert_failure_skips_cache() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockCacheService::new();

        repo.expect_find_by_long_url().returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .returning(|_| Err(AppError::storage("Database error", json!({}))));
        cache.expect_set().times(0);

        let service = service(repo, cache, fixed_generator("abc123"));

        let err = service.create("https://example.com").await.unwrap_err();

        assert!(matches!(err, AppError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_create_collision_surfaces_retryable_error_without_regenerating() {
        let mut repo = MockLinkRepository::new();
        let cache = MockCacheService::new();
        let mut generator = MockCodeGenerator::new();

        repo.expect_find_by_long_url().returning(|_| Ok(None));
        repo.expect_insert().times(1).returning(|_| {
            Err(AppError::retryable_storage(
                "Unique constraint violation",
                json!({ "constraint": "links_pkey" }),
            ))
        });
        generator
            .expect_generate()
            .times(1)
            .returning(|| "taken1".to_string());

        let service = service(repo, cache, generator);

        let err = service.create("https://example.com").await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Storage {
                retryable: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_create_succeeds_when_cache_write_fails() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockCacheService::new();

        repo.expect_find_by_long_url().returning(|_| Ok(None));
        repo.expect_insert().times(1).returning(|_| Ok(()));
        cache.expect_set().times(1).returning(|_, _, _| {
            Err(CacheError::ConnectionError("connection refused".to_string()))
        });

        let service = service(repo, cache, fixed_generator("abc123"));

        let link = service.create("https://example.com").await.unwrap();

        assert_eq!(link.short_code, "abc123");
    }

    #[tokio::test]
    async fn test_create_lookup_failure_propagates() {
        let mut repo = MockLinkRepository::new();
        let cache = MockCacheService::new();
        let mut generator = MockCodeGenerator::new();

        repo.expect_find_by_long_url()
            .returning(|_| Err(AppError::storage("Database error", json!({}))));
        repo.expect_insert().times(0);
        generator.expect_generate().times(0);

        let service = service(repo, cache, generator);

        let err = service.create("https://example.com").await.unwrap_err();

        assert!(matches!(err, AppError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_resolve_cache_hit_increments_without_store_lookup() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockCacheService::new();

        cache
            .expect_get()
            .withf(|key| key == "abc123")
            .times(1)
            .returning(|_| Ok(Some("https://example.com".to_string())));
        cache.expect_set().times(0);
        repo.expect_find_by_code().times(0);
        repo.expect_increment_clicks()
            .withf(|code, delta| code == "abc123" && *delta == 1)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(repo, cache, MockCodeGenerator::new());

        let url = service.resolve_url("abc123").await.unwrap();

        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_cache_miss_reads_store_warms_cache_and_increments() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockCacheService::new();
        let mut seq = mockall::Sequence::new();

        cache
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(test_link("abc123", "https://example.com", 3))));
        cache
            .expect_set()
            .withf(|key, value, _| key == "abc123" && value == "https://example.com")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        repo.expect_increment_clicks()
            .withf(|code, delta| code == "abc123" && *delta == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let service = service(repo, cache, MockCodeGenerator::new());

        let url = service.resolve_url("abc123").await.unwrap();

        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_not_found_does_not_increment() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockCacheService::new();

        cache.expect_get().returning(|_| Ok(None));
        cache.expect_set().times(0);
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));
        repo.expect_increment_clicks().times(0);

        let service = service(repo, cache, MockCodeGenerator::new());

        let err = service.resolve_url("unknown").await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_resolve_cache_read_error_falls_back_to_store() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockCacheService::new();

        cache.expect_get().times(1).returning(|_| {
            Err(CacheError::OperationError("timeout".to_string()))
        });
        cache.expect_set().returning(|_, _, _| Ok(()));
        repo.expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc123", "https://example.com", 0))));
        repo.expect_increment_clicks()
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(repo, cache, MockCodeGenerator::new());

        let url = service.resolve_url("abc123").await.unwrap();

        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_cache_read_error_with_missing_link_is_not_found() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockCacheService::new();

        cache.expect_get().returning(|_| {
            Err(CacheError::ConnectionError("connection refused".to_string()))
        });
        repo.expect_find_by_code().returning(|_| Ok(None));
        repo.expect_increment_clicks().times(0);

        let service = service(repo, cache, MockCodeGenerator::new());

        let err = service.resolve_url("abc123").await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_resolve_cache_warm_failure_does_not_fail() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockCacheService::new();

        cache.expect_get().returning(|_| Ok(None));
        cache.expect_set().times(1).returning(|_, _, _| {
            Err(CacheError::OperationError("READONLY".to_string()))
        });
        repo.expect_find_by_code()
            .returning(|_| Ok(Some(test_link("abc123", "https://example.com", 0))));
        repo.expect_increment_clicks()
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(repo, cache, MockCodeGenerator::new());

        assert!(service.resolve_url("abc123").await.is_ok());
    }

    #[tokio::test]
    async fn test_resolve_store_error_is_not_reported_as_not_found() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockCacheService::new();

        cache.expect_get().returning(|_| Ok(None));
        repo.expect_find_by_code().returning(|_| {
            Err(AppError::retryable_storage(
                "Timed out waiting for a database connection",
                json!({}),
            ))
        });
        repo.expect_increment_clicks().times(0);

        let service = service(repo, cache, MockCodeGenerator::new());

        let err = service.resolve_url("abc123").await.unwrap_err();

        assert!(!err.is_not_found());
        assert!(matches!(err, AppError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_resolve_increment_failure_fails_resolve() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockCacheService::new();

        cache
            .expect_get()
            .returning(|_| Ok(Some("https://example.com".to_string())));
        repo.expect_increment_clicks()
            .times(1)
            .returning(|_, _| Err(AppError::storage("Database error", json!({}))));

        let service = service(repo, cache, MockCodeGenerator::new());

        let err = service.resolve_url("abc123").await.unwrap_err();

        assert!(matches!(err, AppError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_get_stats_reads_store_only() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockCacheService::new();

        repo.expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(Some(test_link("abc123", "https://example.com", 42))));
        repo.expect_increment_clicks().times(0);
        cache.expect_get().times(0);
        cache.expect_set().times(0);

        let service = service(repo, cache, MockCodeGenerator::new());

        let link = service.get_stats("abc123").await.unwrap();

        assert_eq!(link.click_count, 42);
    }

    #[tokio::test]
    async fn test_get_stats_not_found() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_code().returning(|_| Ok(None));

        let service = service(repo, MockCacheService::new(), MockCodeGenerator::new());

        let err = service.get_stats("unknown").await.unwrap_err();

        assert!(err.is_not_found());
    }
}
