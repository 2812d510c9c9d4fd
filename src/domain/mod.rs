//! Domain layer containing the short link entity and data access contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Durable store trait definitions
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Repository traits define contracts implemented by the
//! infrastructure layer, and the coordination logic lives in
//! [`crate::application::services`].

pub mod entities;
pub mod repositories;
