//! Short link entity.

use chrono::{DateTime, SubsecRound, Utc};

/// A short code mapped to the long URL it resolves to.
///
/// `short_code` and `created_at` never change after creation. `click_count`
/// only moves through the store's atomic increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub short_code: String,
    pub long_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// Creates a fresh, never-clicked link stamped with the current time.
    ///
    /// The timestamp is truncated to microseconds, the precision of
    /// PostgreSQL `TIMESTAMPTZ`, so the returned value matches what a later
    /// read from the store yields.
    pub fn new(short_code: String, long_url: String) -> Self {
        Self {
            short_code,
            long_url,
            click_count: 0,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}
