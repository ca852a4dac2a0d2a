//! Database error types
//!
//! Lookups that can legitimately miss return `Option` instead of an
//! error, so the error surface is the store failing or a uniqueness
//! violation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}
