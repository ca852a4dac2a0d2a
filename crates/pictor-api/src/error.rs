//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] pictor_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] pictor_auth::AuthError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", "Forbidden".to_string()),
            ApiError::Database(e) => match e {
                pictor_db::DbError::Duplicate(msg) => {
                    (StatusCode::CONFLICT, "DUPLICATE_IDENTITY", msg.clone())
                }
                // The only retry-eligible failure class: the store itself
                // is unreachable or failing, not the request.
                pictor_db::DbError::Connection(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORE_UNAVAILABLE",
                    "Persistence layer unavailable".to_string(),
                ),
            },
            ApiError::Auth(e) => match e {
                pictor_auth::AuthError::UserNotFound => {
                    (StatusCode::NOT_FOUND, "AUTH_ERROR", e.to_string())
                }
                // A hashing failure is an internal fault; keep the argon2
                // detail out of the response body.
                pictor_auth::AuthError::PasswordHash(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal error".to_string(),
                ),
                _ => (StatusCode::UNAUTHORIZED, "AUTH_ERROR", e.to_string()),
            },
        };

        let body = axum::Json(json!({
            "errors": [{
                "code": code,
                "message": message,
                "detail": null
            }]
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pictor_auth::AuthError;
    use pictor_db::DbError;

    #[test]
    fn test_auth_error_status_mapping() {
        assert_eq!(
            ApiError::Auth(AuthError::InvalidCredentials)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Auth(AuthError::TokenExpired)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Auth(AuthError::MissingAuthHeader)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Auth(AuthError::UserNotFound)
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_db_error_status_mapping() {
        assert_eq!(
            ApiError::Database(DbError::Duplicate("username already taken".into()))
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn test_password_hash_failure_is_opaque_internal_error() {
        let response =
            ApiError::Auth(AuthError::PasswordHash("argon2 backend detail".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!body.contains("argon2"));
        assert!(body.contains("INTERNAL_ERROR"));
    }
}
