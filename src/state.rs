//! Shared application state injected into HTTP handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::CodeGenerator;

/// State shared by all handlers.
///
/// Holds one store client and one cache client for the whole process;
/// cloning the state only clones the `Arc` handles.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub link_repository: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    /// Wires the link service over the given store, cache and generator.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        code_generator: Arc<dyn CodeGenerator>,
        cache_ttl: Option<Duration>,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(
            link_repository.clone(),
            cache.clone(),
            code_generator,
            cache_ttl,
        ));

        Self {
            link_service,
            link_repository,
            cache,
        }
    }
}
