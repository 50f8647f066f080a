//! Gallery image storage

use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::BoxError;
use crate::util::now_millis;

/// A stored gallery image. The binary itself lives in the media store, this
/// row only references it.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: String,
    pub cloudinary_url: String,
    pub public_id: String,
    pub description: String,
    pub created_at: i64,
}

/// A completed upload waiting to be recorded
#[derive(Debug, Clone)]
pub struct NewImage {
    pub url: String,
    pub public_id: String,
    pub description: String,
}

/// List all images, newest first.
pub async fn list(pool: &SqlitePool) -> Result<Vec<GalleryImage>, BoxError> {
    let images = sqlx::query_as::<_, GalleryImage>(
        "SELECT id, cloudinary_url, public_id, description, created_at
         FROM gallery_images
         ORDER BY created_at DESC, rowid DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(images)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<GalleryImage>, BoxError> {
    let image = sqlx::query_as::<_, GalleryImage>(
        "SELECT id, cloudinary_url, public_id, description, created_at
         FROM gallery_images
         WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(image)
}

/// Record a batch of uploads in one statement. Either every row lands or none does.
pub async fn insert_batch(
    pool: &SqlitePool,
    new: &[NewImage],
) -> Result<Vec<GalleryImage>, BoxError> {
    if new.is_empty() {
        return Ok(vec![]);
    }

    let now = now_millis();
    let images: Vec<GalleryImage> = new
        .iter()
        .map(|n| GalleryImage {
            id: Uuid::new_v4().to_string(),
            cloudinary_url: n.url.clone(),
            public_id: n.public_id.clone(),
            description: n.description.clone(),
            created_at: now,
        })
        .collect();

    // Dynamic query: variable number of row tuples — keep as runtime query
    let placeholders = images
        .iter()
        .map(|_| "(?, ?, ?, ?, ?)")
        .collect::<Vec<_>>()
        .join(",");
    let sql = format!(
        "INSERT INTO gallery_images (id, cloudinary_url, public_id, description, created_at)
         VALUES {placeholders}"
    );
    let mut query = sqlx::query(&sql);
    for image in &images {
        query = query
            .bind(&image.id)
            .bind(&image.cloudinary_url)
            .bind(&image.public_id)
            .bind(&image.description)
            .bind(image.created_at);
    }
    query.execute(pool).await?;

    Ok(images)
}

/// Delete an image row. Returns whether a row was removed.
pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM gallery_images WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
