//! Shared utilities: error types and request contexts.

pub mod context;
pub mod errors;
