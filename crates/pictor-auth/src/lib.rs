//! Pictor Authentication and Authorization
//!
//! This crate provides password hashing, JWT-based session tokens, and
//! the per-request authenticated context used for role-based access
//! control.

pub mod context;
pub mod error;
pub mod jwt;
pub mod password;

pub use context::{AuthUser, extract_bearer_token};
pub use error::AuthError;
pub use jwt::{Claims, JwtManager};
pub use password::{hash_password, verify_password};
