//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating the cache, the
//! durable store and the code generator. Services consume the repository and
//! cache traits and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation, resolution and statistics

pub mod services;
