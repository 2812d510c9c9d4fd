//! Core domain entities.
//!
//! - [`ShortLink`] - A short code mapped to a long URL with its click counter

pub mod short_link;

pub use short_link::ShortLink;
