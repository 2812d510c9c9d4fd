//! DTOs for link shortening endpoint.

use serde::Deserialize;
use validator::Validate;

use crate::utils::url_validator::validate_http_url;

/// Request to shorten a single long URL.
///
/// The URL is stored exactly as submitted; two requests with the same
/// string receive the same short code.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (absolute HTTP/HTTPS, at most 2048 characters).
    #[serde(rename = "longUrl")]
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    #[validate(custom(function = "validate_http_url"))]
    pub long_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str) -> ShortenRequest {
        ShortenRequest {
            long_url: url.to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("https://example.com/some/path").validate().is_ok());
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let errors = request("ftp://example.com").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("long_url"));
    }

    #[test]
    fn test_rejects_too_long_url() {
        let url = format!("https://example.com/{}", "a".repeat(2048));
        assert!(request(&url).validate().is_err());
    }

    #[test]
    fn test_rejects_empty_url() {
        assert!(request("").validate().is_err());
    }

    #[test]
    fn test_deserializes_camel_case_field() {
        let req: ShortenRequest =
            serde_json::from_str(r#"{"longUrl":"https://example.com"}"#).unwrap();
        assert_eq!(req.long_url, "https://example.com");
    }
}
