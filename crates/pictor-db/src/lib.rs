//! Pictor Database Layer
//!
//! This crate provides the persistence layer for Pictor, using SQLite
//! via sqlx. It holds the credential store (users) and the image
//! metadata records that the protected API operates on.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;

/// Re-export sqlx types for convenience
pub use sqlx::SqlitePool;
