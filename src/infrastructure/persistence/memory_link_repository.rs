//! Process-local implementation of the link repository.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// In-memory link store backed by a `DashMap` keyed by short code.
///
/// Increments mutate the record under the shard write lock, so concurrent
/// increments of one code never lose updates. Used by tests and for running
/// without PostgreSQL.
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    storage: DashMap<String, ShortLink>,
}

impl InMemoryLinkRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if no links are stored.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.storage.get(code).map(|link| link.clone()))
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortLink>, AppError> {
        let found = self
            .storage
            .iter()
            .filter(|link| link.long_url == long_url)
            .min_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.short_code.cmp(&b.short_code))
            })
            .map(|link| link.clone());

        Ok(found)
    }

    async fn insert(&self, link: &ShortLink) -> Result<(), AppError> {
        match self.storage.entry(link.short_code.clone()) {
            Entry::Occupied(_) => Err(AppError::retryable_storage(
                "Unique constraint violation",
                json!({ "constraint": "links_pkey", "code": link.short_code }),
            )),
            Entry::Vacant(slot) => {
                slot.insert(link.clone());
                Ok(())
            }
        }
    }

    async fn increment_clicks(&self, code: &str, delta: i64) -> Result<(), AppError> {
        let Some(mut link) = self.storage.get_mut(code) else {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "code": code }),
            ));
        };

        link.click_count += delta;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
