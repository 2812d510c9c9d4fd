//! DTO describing a stored short link.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::ShortLink;

/// JSON representation of a [`ShortLink`].
///
/// Returned by `POST /shorten` and `GET /stats/{code}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkResponse {
    pub short_code: String,
    pub long_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ShortLink> for ShortLinkResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            short_code: link.short_code,
            long_url: link.long_url,
            click_count: link.click_count,
            created_at: link.created_at,
        }
    }
}
