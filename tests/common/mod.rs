//! Shared helpers for the integration suites
//!
//! Every suite runs the real router against an in-memory SQLite pool and a
//! stub media store, so no test touches the network or the filesystem.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{Router, body::Body};
use http::{Request, Response, header};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use fortafit_server::api::create_router;
use fortafit_server::db::MIGRATOR;
use fortafit_server::media::{MediaStore, MediaStoreError, SignedUpload, StoredAsset};
use fortafit_server::{AppState, UploadMode};

pub const TEST_SECRET: &str = "integration-test-secret";

/// In-process media store. Records deletes and hands out predictable assets.
#[derive(Default)]
pub struct StubMedia {
    pub fail_uploads: bool,
    pub fail_deletes: bool,
    /// Content types the store turns away, for failing one file in a batch.
    pub reject_content_types: Vec<&'static str>,
    pub uploaded: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaStore for StubMedia {
    fn sign_upload(&self, timestamp: i64) -> SignedUpload {
        SignedUpload {
            signature: "stub-signature".to_string(),
            timestamp,
        }
    }

    async fn upload(&self, content_type: &str, _bytes: &[u8]) -> Result<StoredAsset, MediaStoreError> {
        if self.fail_uploads || self.reject_content_types.iter().any(|t| *t == content_type) {
            return Err(MediaStoreError::Rejected(
                "Cloudinary upload failed: stub refused".to_string(),
            ));
        }
        let mut uploaded = self.uploaded.lock().unwrap();
        let n = uploaded.len();
        uploaded.push(content_type.to_string());
        Ok(StoredAsset {
            url: format!("https://media.test/asset-{n}"),
            public_id: format!("gallery_uploads/stub-{n}"),
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaStoreError> {
        if self.fail_deletes {
            return Err(MediaStoreError::Rejected(
                "Cloudinary delete failed: not found".to_string(),
            ));
        }
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

async fn memory_pool() -> SqlitePool {
    // One connection so every query sees the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    pool
}

pub async fn test_state(mode: UploadMode, media: Arc<StubMedia>) -> AppState {
    AppState {
        pool: memory_pool().await,
        media,
        session_secret: TEST_SECRET.to_string(),
        upload_mode: mode,
    }
}

/// Router plus a handle on the stub store for asserting on its calls.
pub async fn test_app(mode: UploadMode) -> (Router, Arc<StubMedia>) {
    let media = Arc::new(StubMedia::default());
    let state = test_state(mode, media.clone()).await;
    (create_router(state), media)
}

pub async fn test_app_with_media(mode: UploadMode, media: StubMedia) -> (Router, Arc<StubMedia>) {
    let media = Arc::new(media);
    let state = test_state(mode, media.clone()).await;
    (create_router(state), media)
}

pub fn admin_token() -> String {
    fortafit_server::auth::create_token("admin-1", "admin@fortafit.ro", "Admin", TEST_SECRET)
        .unwrap()
}

// ── Request builders ────────────────────────────────────────────────

pub fn request(method: &str, uri: &str) -> http::request::Builder {
    Request::builder().method(method).uri(uri)
}

pub fn bearer(builder: http::request::Builder, token: &str) -> http::request::Builder {
    builder.header(header::AUTHORIZATION, format!("Bearer {token}"))
}

pub fn empty(builder: http::request::Builder) -> Request<Body> {
    builder.body(Body::empty()).unwrap()
}

pub fn json_body(builder: http::request::Builder, body: &serde_json::Value) -> Request<Body> {
    builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub const MULTIPART_BOUNDARY: &str = "fortafit-test-boundary";

/// Build a multipart/form-data body of `files` parts.
pub fn multipart_files(parts: &[(&str, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (file_name, bytes) in parts {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    bearer(request("POST", "/api/v1/gallery"), &admin_token())
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Smallest buffer `image` detects as PNG, padded to `len`.
pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.resize(len.max(8), 0);
    bytes
}

// ── Response helpers ────────────────────────────────────────────────

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
