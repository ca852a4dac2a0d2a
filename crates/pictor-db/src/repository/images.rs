//! Image metadata record operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{Image, NewImage};
use crate::repository::Database;

impl Database {
    // ==================== Image Operations ====================

    /// Insert a new image record
    pub async fn insert_image(&self, image: NewImage) -> Result<Image, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO images (url, public_id, photo_name, event_type, batch, uploaded_by, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&image.url)
        .bind(&image.public_id)
        .bind(&image.photo_name)
        .bind(&image.event_type)
        .bind(&image.batch)
        .bind(image.uploaded_by)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(Image {
            id,
            url: image.url,
            public_id: image.public_id,
            photo_name: image.photo_name,
            event_type: image.event_type,
            batch: image.batch,
            uploaded_by: image.uploaded_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get an image record by ID
    pub async fn get_image_by_id(&self, id: i64) -> Result<Option<Image>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, url, public_id, photo_name, event_type, batch, uploaded_by, created_at, updated_at
            FROM images
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| Image::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// List all image records
    pub async fn list_images(&self) -> Result<Vec<Image>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, url, public_id, photo_name, event_type, batch, uploaded_by, created_at, updated_at
            FROM images
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Image::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Rename a photo
    pub async fn update_photo_name(&self, id: i64, photo_name: &str) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE images
            SET photo_name = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(photo_name)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an image record
    pub async fn delete_image(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM images WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
