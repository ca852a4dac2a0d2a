//! Authenticated request context

use pictor_db::UserRole;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::jwt::Claims;

/// Authenticated user information
///
/// Built from verified token claims by the authorization gate and
/// attached to the request; lives only for the request's duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
}

impl AuthUser {
    /// Create from verified JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            id: claims.sub.parse().unwrap_or(0),
            username: claims.username.clone(),
            role: claims.role.parse().unwrap_or(UserRole::User),
        }
    }
}

/// Extract the bearer token from an Authorization header value
pub fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    if !header.starts_with("Bearer ") {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(&header[7..])
}
