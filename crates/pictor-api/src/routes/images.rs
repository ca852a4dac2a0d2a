//! Image record routes
//!
//! All routes sit behind the authorization gate; deletion additionally
//! requires the admin role.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use pictor_db::NewImage;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::{RequireAdmin, RequireAuth};
use super::types::{CreateImageRequest, ImageResponse, UpdatePhotoNameRequest};

/// POST /api/images (authenticated)
async fn create_image(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateImageRequest>,
) -> Result<(StatusCode, Json<ImageResponse>), ApiError> {
    if request.url.is_empty() || request.photo_name.is_empty() {
        return Err(ApiError::BadRequest(
            "url and photo_name are required".to_string(),
        ));
    }

    debug!("User {} creating image record", user.username);

    let image = state
        .db
        .insert_image(NewImage {
            url: request.url,
            public_id: request.public_id,
            photo_name: request.photo_name,
            event_type: request.event_type,
            batch: request.batch,
            uploaded_by: user.id,
        })
        .await?;

    info!("Image {} recorded by user {}", image.id, user.username);

    Ok((StatusCode::CREATED, Json(image.into())))
}

/// GET /api/images (authenticated)
async fn list_images(
    _user: RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<ImageResponse>>, ApiError> {
    let images = state.db.list_images().await?;

    Ok(Json(images.into_iter().map(ImageResponse::from).collect()))
}

/// PATCH /api/images/{id}/name (authenticated)
async fn update_photo_name(
    _user: RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePhotoNameRequest>,
) -> Result<Json<ImageResponse>, ApiError> {
    if request.photo_name.is_empty() {
        return Err(ApiError::BadRequest("photo_name is required".to_string()));
    }

    let renamed = state.db.update_photo_name(id, &request.photo_name).await?;
    if !renamed {
        return Err(ApiError::NotFound(format!("Image: {}", id)));
    }

    let image = state
        .db
        .get_image_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Image: {}", id)))?;

    Ok(Json(image.into()))
}

/// DELETE /api/images/{id} (admin only)
async fn delete_image(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    debug!("Admin {} deleting image {}", admin.username, id);

    let deleted = state.db.delete_image(id).await?;

    if deleted {
        info!("Deleted image: {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Image: {}", id)))
    }
}

/// Create image routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/images", post(create_image))
        .route("/api/images", get(list_images))
        .route("/api/images/{id}/name", patch(update_photo_name))
        .route("/api/images/{id}", delete(delete_image))
}
