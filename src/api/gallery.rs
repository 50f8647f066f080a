//! Gallery endpoints: listing, upload signing, the two upload paths, delete
//!
//! Uploads follow upload-then-record: a binary is never referenced by the
//! database before the media store holds it. In `direct` mode the browser
//! uploads with a server-issued signature and posts the resulting
//! `{url, public_id}` pairs back; in `mediated` mode the server accepts the
//! files itself. One deployment accepts exactly one of the two body shapes.

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use futures::future;
use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::auth::Authenticated;
use crate::config::UploadMode;
use crate::db::images::{self, GalleryImage, NewImage};
use crate::error::{ApiResult, AppError, AppJson, FieldIssue};
use crate::media::SignedUpload;
use crate::state::AppState;
use crate::util::now_millis;

const MAX_FILES_PER_UPLOAD: usize = 5;
const MAX_FILE_MIB: usize = 5;
const MAX_FILE_BYTES: usize = MAX_FILE_MIB * 1024 * 1024;

/// GET /api/v1/gallery
#[derive(Serialize)]
pub struct GalleryListResponse {
    pub images: Vec<GalleryImage>,
}

/// POST /api/v1/gallery in `direct` mode: results of a browser-direct upload
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersistRequest {
    pub images: Vec<PrecomputedImage>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrecomputedImage {
    pub url: String,
    pub public_id: String,
    #[serde(default)]
    pub description: String,
}

pub async fn list_images(State(state): State<AppState>) -> ApiResult<Json<GalleryListResponse>> {
    let images = images::list(&state.pool).await?;
    Ok(Json(GalleryListResponse { images }))
}

/// GET /api/v1/cloudinary-sign — Phase A of the direct upload flow
pub async fn sign_upload(State(state): State<AppState>) -> Json<SignedUpload> {
    let timestamp = now_millis() / 1000;
    Json(state.media.sign_upload(timestamp))
}

/// POST /api/v1/gallery. The accepted body shape depends on the deployment's
/// upload mode; the other shape is rejected up front.
pub async fn create_images(
    State(state): State<AppState>,
    Extension(identity): Extension<Authenticated>,
    request: Request,
) -> ApiResult<Response> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    match state.upload_mode {
        UploadMode::Mediated => {
            if !content_type.starts_with("multipart/form-data") {
                return Err(AppError::bad_request(
                    "expected multipart form data with a 'files' field",
                ));
            }
            let multipart = Multipart::from_request(request, &state)
                .await
                .map_err(|e| AppError::bad_request(format!("Multipart error: {e}")))?;
            upload_and_persist(&state, &identity, multipart).await
        }
        UploadMode::Direct => {
            if !content_type.starts_with("application/json") {
                return Err(AppError::bad_request(
                    "expected a JSON body with precomputed upload results",
                ));
            }
            let AppJson(req) = AppJson::<PersistRequest>::from_request(request, &state).await?;
            persist_precomputed(&state, &identity, req).await
        }
    }
}

pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<GalleryImage>> {
    // Find without deleting so the record survives a failed store delete
    let image = images::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Image with id {id} not found")))?;

    if image.public_id.is_empty() {
        return Err(AppError::invalid_state(format!(
            "Image {id} has no public id"
        )));
    }

    state.media.delete(&image.public_id).await?;

    images::delete(&state.pool, &id).await?;

    tracing::info!(image = %id, "Gallery image deleted");

    Ok(Json(image))
}

// ── Mediated path ───────────────────────────────────────────────────

struct UploadFile {
    file_name: String,
    bytes: Bytes,
}

async fn read_multipart(mut multipart: Multipart) -> Result<Vec<UploadFile>, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("files") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(format!("Multipart error: {e}")))?;
        files.push(UploadFile { file_name, bytes });

        if files.len() > MAX_FILES_PER_UPLOAD {
            return Err(AppError::validation(vec![FieldIssue::new(
                "files",
                format!("at most {MAX_FILES_PER_UPLOAD} files per upload"),
            )]));
        }
    }

    if files.is_empty() {
        return Err(AppError::validation(vec![FieldIssue::new(
            "files",
            "files must not be empty",
        )]));
    }
    Ok(files)
}

/// Check size and magic bytes per file, returning the detected formats.
fn validate_files(files: &[UploadFile]) -> Result<Vec<ImageFormat>, AppError> {
    let mut issues = Vec::new();
    let mut formats = Vec::with_capacity(files.len());

    for (i, file) in files.iter().enumerate() {
        let field = format!("files[{i}]");
        if file.bytes.len() > MAX_FILE_BYTES {
            issues.push(FieldIssue::new(
                field,
                format!("{} is larger than the {MAX_FILE_MIB} MiB limit", file.file_name),
            ));
            continue;
        }
        match image::guess_format(&file.bytes).ok() {
            Some(f) if matches!(f, ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP) => {
                formats.push(f);
            }
            _ => issues.push(FieldIssue::new(
                field,
                format!("{} is not a png, jpeg or webp image", file.file_name),
            )),
        }
    }

    if issues.is_empty() {
        Ok(formats)
    } else {
        Err(AppError::validation(issues))
    }
}

async fn upload_and_persist(
    state: &AppState,
    identity: &Authenticated,
    multipart: Multipart,
) -> ApiResult<Response> {
    let files = read_multipart(multipart).await?;
    let formats = validate_files(&files)?;

    // Phase B: uploads run concurrently; one failure does not cancel the rest
    let uploads = files
        .iter()
        .zip(&formats)
        .map(|(file, format)| state.media.upload(format.to_mime_type(), &file.bytes));
    let results = future::join_all(uploads).await;

    let mut stored = Vec::new();
    let mut failed = Vec::new();
    for (file, result) in files.iter().zip(results) {
        match result {
            Ok(asset) => stored.push(NewImage {
                url: asset.url,
                public_id: asset.public_id,
                description: String::new(),
            }),
            Err(e) => {
                tracing::warn!(file = %file.file_name, error = %e, "Media store refused upload");
                failed.push(serde_json::json!({
                    "filename": file.file_name,
                    "error": e.to_string(),
                }));
            }
        }
    }

    if stored.is_empty() {
        return Err(AppError::media("no file could be uploaded to the media store"));
    }

    persist_assets(state, identity, stored, failed).await
}

// ── Direct path ─────────────────────────────────────────────────────

fn validate_precomputed(req: &PersistRequest) -> Result<(), AppError> {
    let mut issues = Vec::new();
    if req.images.is_empty() {
        issues.push(FieldIssue::new("images", "images must not be empty"));
    }
    if req.images.len() > MAX_FILES_PER_UPLOAD {
        issues.push(FieldIssue::new(
            "images",
            format!("at most {MAX_FILES_PER_UPLOAD} images per request"),
        ));
    }
    for (i, image) in req.images.iter().enumerate() {
        if image.url.trim().is_empty() {
            issues.push(FieldIssue::new(
                format!("images[{i}].url"),
                "url must not be empty",
            ));
        }
        if image.public_id.trim().is_empty() {
            issues.push(FieldIssue::new(
                format!("images[{i}].public_id"),
                "public_id must not be empty",
            ));
        }
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(issues))
    }
}

async fn persist_precomputed(
    state: &AppState,
    identity: &Authenticated,
    req: PersistRequest,
) -> ApiResult<Response> {
    validate_precomputed(&req)?;

    let stored: Vec<NewImage> = req
        .images
        .into_iter()
        .map(|i| NewImage {
            url: i.url,
            public_id: i.public_id,
            description: i.description,
        })
        .collect();

    persist_assets(state, identity, stored, Vec::new()).await
}

// ── Phase C ─────────────────────────────────────────────────────────

/// Record uploaded assets in one batch. If the insert fails the binaries are
/// already in the store, so the response echoes them back for manual
/// reconciliation instead of pretending nothing happened.
async fn persist_assets(
    state: &AppState,
    identity: &Authenticated,
    stored: Vec<NewImage>,
    failed: Vec<serde_json::Value>,
) -> ApiResult<Response> {
    let images = match images::insert_batch(&state.pool, &stored).await {
        Ok(images) => images,
        Err(e) => {
            tracing::error!(error = %e, "Uploaded images could not be recorded");
            let uploaded: Vec<serde_json::Value> = stored
                .iter()
                .map(|a| serde_json::json!({ "url": a.url, "public_id": a.public_id }))
                .collect();
            let body = serde_json::json!({
                "error": "images uploaded but not saved",
                "uploaded": uploaded,
            });
            return Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response());
        }
    };

    tracing::info!(admin = %identity.email, count = images.len(), "Gallery images added");

    let mut body = serde_json::json!({ "success": true, "images": images });
    if !failed.is_empty() {
        body["failed"] = serde_json::Value::Array(failed);
    }
    Ok((StatusCode::CREATED, Json(body)).into_response())
}
