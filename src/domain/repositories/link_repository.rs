//! Repository trait for the durable short link store.

use crate::domain::entities::ShortLink;
use crate::error::AppError;
use async_trait::async_trait;

/// The authoritative store for short links.
///
/// Implementations must be safe for concurrent independent calls through a
/// single shared instance.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failures.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Finds a link by its original long URL.
    ///
    /// Nothing enforces one record per URL, so when several match the one
    /// with the earliest `created_at` wins, ties broken by the smallest code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failures.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortLink>, AppError>;

    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns a retryable [`AppError::Storage`] if the short code is already
    /// taken, and [`AppError::Storage`] on other store failures.
    async fn insert(&self, link: &ShortLink) -> Result<(), AppError>;

    /// Atomically adds `delta` to the click count of a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Storage`] on store failures.
    async fn increment_clicks(&self, code: &str, delta: i64) -> Result<(), AppError>;

    /// Verifies the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the store cannot be reached.
    async fn ping(&self) -> Result<(), AppError>;
}
