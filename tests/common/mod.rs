#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::extract::ConnectInfo;
use link_shortener::api::routes::link_routes;
use link_shortener::domain::entities::ShortLink;
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::error::AppError;
use link_shortener::infrastructure::cache::{CacheError, CacheResult, CacheService, InMemoryCache};
use link_shortener::infrastructure::persistence::InMemoryLinkRepository;
use link_shortener::state::AppState;
use link_shortener::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
use serde_json::json;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::Layer;

/// In-memory backends behind an [`AppState`], kept for direct inspection.
pub struct TestContext {
    pub state: AppState,
    pub repository: Arc<InMemoryLinkRepository>,
    pub cache: Arc<InMemoryCache>,
}

pub fn create_test_context() -> TestContext {
    create_test_context_with(Arc::new(RandomCodeGenerator::new()), None)
}

pub fn create_test_context_with(
    generator: Arc<dyn CodeGenerator>,
    cache_ttl: Option<Duration>,
) -> TestContext {
    let repository = Arc::new(InMemoryLinkRepository::new());
    let cache = Arc::new(InMemoryCache::new());

    let state = AppState::new(repository.clone(), cache.clone(), generator, cache_ttl);

    TestContext {
        state,
        repository,
        cache,
    }
}

/// Link routes without rate limiting, bound to `state`.
pub fn link_app(state: AppState) -> Router {
    link_routes().layer(MockConnectInfoLayer).with_state(state)
}

pub async fn insert_link(repository: &InMemoryLinkRepository, code: &str, url: &str) -> ShortLink {
    let link = ShortLink::new(code.to_string(), url.to_string());
    repository.insert(&link).await.unwrap();
    link
}

/// Returns the queued codes in order, then falls back to random codes.
pub struct SequenceCodeGenerator {
    codes: Mutex<VecDeque<String>>,
}

impl SequenceCodeGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
        }
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self) -> String {
        self.codes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| RandomCodeGenerator::new().generate())
    }
}

/// Store whose every operation fails with a retryable storage error.
pub struct UnavailableRepository;

fn unavailable() -> AppError {
    AppError::retryable_storage("Database unavailable", json!({}))
}

#[async_trait]
impl LinkRepository for UnavailableRepository {
    async fn find_by_code(&self, _code: &str) -> Result<Option<ShortLink>, AppError> {
        Err(unavailable())
    }

    async fn find_by_long_url(&self, _long_url: &str) -> Result<Option<ShortLink>, AppError> {
        Err(unavailable())
    }

    async fn insert(&self, _link: &ShortLink) -> Result<(), AppError> {
        Err(unavailable())
    }

    async fn increment_clicks(&self, _code: &str, _delta: i64) -> Result<(), AppError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}

fn refused() -> CacheError {
    CacheError::ConnectionError("connection refused".to_string())
}

/// Cache that is unreachable: reads and writes fail, health check is false.
pub struct UnavailableCache;

#[async_trait]
impl CacheService for UnavailableCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(refused())
    }

    async fn set(
        &self,
        _key: &str,
        _value: &str,
        _ttl: Option<Duration>,
    ) -> CacheResult<()> {
        Err(refused())
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(refused())
    }

    async fn health_check(&self) -> bool {
        false
    }
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
