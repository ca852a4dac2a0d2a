//! Pictor REST API
//!
//! This crate provides the Axum-based HTTP API: the authentication flow
//! (register, login, change-password), the authorization gate applied to
//! protected routes, and the image-record endpoints behind it.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
