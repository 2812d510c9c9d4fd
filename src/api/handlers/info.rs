//! Handler for the service information endpoint.

use axum::Json;

use crate::api::dto::info::InfoResponse;

/// `GET /`
pub async fn info_handler() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        description: env!("CARGO_PKG_DESCRIPTION"),
    })
}
