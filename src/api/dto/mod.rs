//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Field names on the wire are camelCase.

pub mod health;
pub mod info;
pub mod short_link;
pub mod shorten;
