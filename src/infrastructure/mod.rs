//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and caching.
//!
//! # Modules
//!
//! - [`cache`] - Fast cache implementations (Redis, in-memory and no-op)
//! - [`persistence`] - Durable store implementations (PostgreSQL and in-memory)

pub mod cache;
pub mod persistence;
