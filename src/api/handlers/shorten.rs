//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::short_link::ShortLinkResponse;
use crate::api::dto::shorten::ShortenRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a long URL, or returns the existing one.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "longUrl": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "shortCode": "aZ3k9Q",
///   "longUrl": "https://example.com/some/long/path",
///   "clickCount": 0,
///   "createdAt": "2025-01-01T12:00:00.123456Z"
/// }
/// ```
///
/// Submitting a URL that was already shortened returns the stored link
/// (including its current click count) with the same status.
///
/// # Errors
///
/// - 400 Bad Request if the URL is malformed, not HTTP/HTTPS, or too long
/// - 503 Service Unavailable on a transient store failure or code collision
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortLinkResponse>), AppError> {
    payload.validate()?;

    let link = state.link_service.create(&payload.long_url).await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}
