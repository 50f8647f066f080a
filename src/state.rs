//! Application state for fortafit-server

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::{Config, UploadMode};
use crate::db;
use crate::error::BoxError;
use crate::media::MediaStore;
use crate::media::cloudinary::CloudinaryStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Media store gallery binaries live in
    pub media: Arc<dyn MediaStore>,
    /// JWT secret for admin sessions
    pub session_secret: String,
    /// Active gallery upload path
    pub upload_mode: UploadMode,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = db::connect(&config.database_url).await?;

        let media: Arc<dyn MediaStore> = Arc::new(CloudinaryStore::new(
            &config.cloudinary_cloud_name,
            &config.cloudinary_api_key,
            &config.cloudinary_api_secret,
        ));

        Ok(Self {
            pool,
            media,
            session_secret: config.session_secret.clone(),
            upload_mode: config.upload_mode,
        })
    }
}
