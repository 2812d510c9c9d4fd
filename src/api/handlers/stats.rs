//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::short_link::ShortLinkResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the stored record for a short code, including its click count.
///
/// # Endpoint
///
/// `GET /stats/{code}`
///
/// Reads the database directly and does not count as a click.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ShortLinkResponse>, AppError> {
    let link = state.link_service.get_stats(&code).await?;

    Ok(Json(link.into()))
}
