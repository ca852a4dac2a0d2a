//! Request/Response DTOs for the API

use pictor_db::{Image, User};
use serde::{Deserialize, Serialize};

// ==================== Auth Types ====================

/// Registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Defaults to "user" when absent
    #[serde(default)]
    pub role: Option<String>,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
}

/// Change password request
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Public projection of a user (never includes the password hash)
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role.as_str().to_string(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

// ==================== Image Types ====================

/// Create image record request
#[derive(Deserialize)]
pub struct CreateImageRequest {
    pub url: String,
    pub public_id: String,
    pub photo_name: String,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
}

/// Rename photo request
#[derive(Deserialize)]
pub struct UpdatePhotoNameRequest {
    pub photo_name: String,
}

/// Image record response
#[derive(Serialize)]
pub struct ImageResponse {
    pub id: i64,
    pub url: String,
    pub public_id: String,
    pub photo_name: String,
    pub event_type: Option<String>,
    pub batch: Option<String>,
    pub uploaded_by: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Image> for ImageResponse {
    fn from(image: Image) -> Self {
        Self {
            id: image.id,
            url: image.url,
            public_id: image.public_id,
            photo_name: image.photo_name,
            event_type: image.event_type,
            batch: image.batch,
            uploaded_by: image.uploaded_by,
            created_at: image.created_at.to_rfc3339(),
            updated_at: image.updated_at.to_rfc3339(),
        }
    }
}
