//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Check cache for the long URL
/// 2. On cache miss or cache error, query the database and repopulate the cache
/// 3. Increment the click counter in the database
/// 4. Return 302 Found
///
/// The click is counted before the response is sent, so a failed increment
/// fails the request instead of silently losing the click.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 5xx if the database is unavailable.
/// Returns 500 if the stored URL cannot be sent as a header value.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let long_url = state.link_service.resolve_url(&code).await?;

    let location = HeaderValue::try_from(long_url).map_err(|_| {
        AppError::internal(
            "Stored URL is not a valid Location header",
            json!({ "code": code }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
