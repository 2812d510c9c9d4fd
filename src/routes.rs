//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`              - Service information (public)
//! - `GET  /health`        - Health check: DB, cache (public)
//! - `POST /shorten`       - Create a short link (rate limited)
//! - `GET  /stats/{code}`  - Link statistics (rate limited)
//! - `GET  /{code}`        - Short link redirect (rate limited)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on link routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, info_handler};
use crate::api::middleware::rate_limit::RateLimitLayer;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `rate_limit` - per-IP limiter applied to the link routes only
pub fn app_router(state: AppState, rate_limit: RateLimitLayer) -> NormalizePath<Router> {
    let link_router = api::routes::link_routes().layer(rate_limit);

    let router = Router::new()
        .route("/", get(info_handler))
        .route("/health", get(health_handler))
        .merge(link_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
