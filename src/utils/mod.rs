//! Utility functions used across the application.
//!
//! - [`code_generator`] - Short code generation
//! - [`url_validator`] - Validation of submitted long URLs

pub mod code_generator;
pub mod url_validator;
