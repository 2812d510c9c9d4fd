//! API route configuration.

use crate::api::handlers::{redirect_handler, shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link routes: creation, statistics and redirect.
///
/// # Endpoints
///
/// - `POST /shorten`       - Create (or look up) a short link
/// - `GET  /stats/{code}`  - Stored record and click count
/// - `GET  /{code}`        - Redirect to the long URL
///
/// Static segments take precedence over the `/{code}` capture, so
/// `/shorten` and `/stats/...` are never treated as short codes.
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/stats/{code}", get(stats_handler))
        .route("/{code}", get(redirect_handler))
}
