//! Unified error handling
//!
//! Every failure a handler can produce becomes an `AppError`, which renders as a
//! JSON body of the shape `{"error": "..."}` (validation errors additionally carry
//! an `issues` array). Database errors are logged server-side and never leaked.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Convenience alias for handler results
pub type ApiResult<T> = Result<T, AppError>;

/// One field-level problem inside a rejected request body
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Client Errors ==========
    #[error("validation failed")]
    Validation(Vec<FieldIssue>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    // ========== Server Errors ==========
    /// A stored record is missing data required to complete the operation
    #[error("{0}")]
    InvalidState(String),

    /// The media store rejected or failed an upload/delete call
    #[error("{0}")]
    MediaStore(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    pub fn validation(issues: Vec<FieldIssue>) -> Self {
        AppError::Validation(issues)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        AppError::InvalidState(msg.into())
    }

    pub fn media(msg: impl Into<String>) -> Self {
        AppError::MediaStore(msg.into())
    }

    pub fn database(err: impl std::fmt::Display) -> Self {
        AppError::Database(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(issues) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "validation failed", "issues": issues }),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::InvalidState(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
            AppError::MediaStore(msg) => {
                error!(target: "media", error = %msg, "Media store error");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::database(e)
    }
}

impl From<BoxError> for AppError {
    fn from(e: BoxError) -> Self {
        AppError::database(e)
    }
}

/// `Json<T>` wrapper whose rejection renders in the `{"error": "..."}` shape
/// instead of axum's plain-text default.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(map_json_rejection(rejection)),
        }
    }
}

fn map_json_rejection(rejection: JsonRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_carries_issues() {
        let err = AppError::validation(vec![FieldIssue::new("name", "Name is required")]);
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "validation failed");
        assert_eq!(body["issues"][0]["field"], "name");
        assert_eq!(body["issues"][0]["message"], "Name is required");
    }

    #[tokio::test]
    async fn database_error_is_not_leaked() {
        let err = AppError::database("connection refused on 10.0.0.3:5432");
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "internal server error");
    }

    #[tokio::test]
    async fn not_found_keeps_its_message() {
        let resp = AppError::not_found("Subscription plan with id abc not found").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Subscription plan with id abc not found");
    }

    #[tokio::test]
    async fn unauthorized_keeps_its_message() {
        let resp = AppError::unauthorized("Invalid email or password").into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Invalid email or password");
    }
}
