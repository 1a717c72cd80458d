//! Foodgram Shared Library
//!
//! This crate contains the request/response types, domain enums and
//! validation helpers shared by the backend API and the fixture importer.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::Role;
pub use types::*;
