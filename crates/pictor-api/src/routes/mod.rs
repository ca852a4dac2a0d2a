//! API routes

pub mod auth;
mod health;
mod images;
pub mod types;

use axum::Router;

use crate::state::AppState;

// Re-export the gate extractors for external use
pub use auth::{RequireAdmin, RequireAuth};

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(images::routes())
        .with_state(state)
}
