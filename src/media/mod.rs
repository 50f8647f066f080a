//! Media storage behind the gallery
//!
//! Image binaries live in an external media store (Cloudinary in production);
//! the database keeps only `(url, public_id)` references. The trait exists so
//! tests can swap in a stub without network access.

pub mod cloudinary;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppError;

/// Folder every gallery upload lands in
pub const UPLOAD_FOLDER: &str = "gallery_uploads";

#[derive(Debug, thiserror::Error)]
pub enum MediaStoreError {
    /// The store answered but refused the operation
    #[error("{0}")]
    Rejected(String),
    /// The store could not be reached or returned an unreadable response
    #[error("media store request failed: {0}")]
    Transport(String),
}

/// Authorization for one browser-direct upload window
#[derive(Debug, Clone, Serialize)]
pub struct SignedUpload {
    pub signature: String,
    pub timestamp: i64,
}

/// A binary the store accepted
#[derive(Debug, Clone, Serialize)]
pub struct StoredAsset {
    pub url: String,
    pub public_id: String,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Sign a direct upload for the given timestamp (seconds).
    fn sign_upload(&self, timestamp: i64) -> SignedUpload;

    /// Upload one image binary into [`UPLOAD_FOLDER`].
    async fn upload(&self, content_type: &str, bytes: &[u8])
    -> Result<StoredAsset, MediaStoreError>;

    /// Delete a stored binary by its public id.
    async fn delete(&self, public_id: &str) -> Result<(), MediaStoreError>;
}

impl From<MediaStoreError> for AppError {
    fn from(e: MediaStoreError) -> Self {
        AppError::media(e.to_string())
    }
}
