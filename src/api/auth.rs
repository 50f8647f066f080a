//! Authentication endpoints: register, login, logout, session introspection

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse},
};
use serde::{Deserialize, Serialize};

use crate::auth::session::{SESSION_COOKIE, SESSION_EXPIRY_HOURS, create_token};
use crate::db::admins;
use crate::error::{ApiResult, AppError, AppJson};
use crate::state::AppState;
use crate::util::{hash_password, verify_password};
use crate::validation::{MAX_NAME_LEN, check_email, check_password, check_required_text};

/// POST /api/v1/auth/register
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// POST /api/v1/auth/login
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub email: String,
    pub name: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut issues = Vec::new();
        check_email(&mut issues, &self.email, "email");
        check_required_text(&mut issues, &self.name, "name", MAX_NAME_LEN);
        check_password(&mut issues, &self.password, "password");
        if issues.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(issues))
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;
    let email = req.email.trim().to_lowercase();

    if admins::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::conflict("Email already exists!"));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::database(format!("password hashing failed: {e}")))?;
    let admin = admins::create(&state.pool, &email, &req.name, &password_hash).await?;

    tracing::info!(email = %admin.email, "Admin account registered");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            email: admin.email,
            name: admin.name,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = req.email.trim().to_lowercase();

    // Same answer for unknown email and wrong password
    let admin = admins::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    if !verify_password(&req.password, &admin.password_hash) {
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let token = create_token(&admin.id, &admin.email, &admin.name, &state.session_secret)
        .map_err(|e| AppError::database(format!("session token creation failed: {e}")))?;

    let cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_EXPIRY_HOURS * 3600
    );

    tracing::info!(email = %admin.email, "Admin logged in");

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse {
            token,
            email: admin.email,
            name: admin.name,
        }),
    ))
}

pub async fn logout() -> impl IntoResponse {
    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(serde_json::json!({ "message": "Logged out" })),
    )
}

pub async fn session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SessionResponse>> {
    let identity = crate::auth::authenticate(&headers, &state.session_secret)
        .ok_or_else(|| AppError::unauthorized("Not authenticated"))?;

    Ok(Json(SessionResponse {
        email: identity.email,
        name: identity.name,
    }))
}
