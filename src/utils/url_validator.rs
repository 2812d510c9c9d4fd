//! Validation of submitted long URLs.
//!
//! URLs are checked, not rewritten: deduplication compares the submitted
//! string exactly, so `https://example.com` and `https://EXAMPLE.com` get
//! distinct codes.

use std::borrow::Cow;
use url::Url;
use validator::ValidationError;

/// Maximum accepted length of a long URL, in characters.
pub const MAX_URL_LENGTH: usize = 2048;

/// Checks that `input` is an absolute HTTP or HTTPS URL with a host.
///
/// Rejects potentially dangerous schemes like `javascript:`, `data:` or
/// `file:`. Used as a `validator` custom function on request DTOs.
///
/// The parser silently drops tabs and newlines and trims surrounding
/// whitespace, but the submitted string is stored as-is and later sent in a
/// `Location` header, so such input is rejected instead.
///
/// # Errors
///
/// Returns a [`ValidationError`] with code `invalid_url` or
/// `unsupported_scheme`.
pub fn validate_http_url(input: &str) -> Result<(), ValidationError> {
    if input.chars().any(char::is_control) || input.trim() != input {
        return Err(ValidationError::new("invalid_url").with_message(Cow::Borrowed(
            "URL must not contain control characters or surrounding whitespace",
        )));
    }

    let url = Url::parse(input).map_err(|e| {
        ValidationError::new("invalid_url").with_message(Cow::Owned(e.to_string()))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::new("unsupported_scheme")
            .with_message(Cow::Borrowed("Only HTTP and HTTPS URLs are allowed")));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::new("invalid_url")
            .with_message(Cow::Borrowed("URL must have a host")));
    }

    Ok(())
}
