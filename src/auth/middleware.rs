//! Route-class session gate
//!
//! One middleware in front of everything. Anonymous requests to dashboard
//! pages bounce to the login page, anonymous protected API writes get a JSON
//! 401, everything else passes through untouched. Authenticated requests
//! carry an [`Authenticated`] extension for handlers that want the identity.

use axum::{
    Json,
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::session::authenticate;
use crate::state::AppState;

/// Where anonymous dashboard visitors are sent
const LOGIN_PAGE: &str = "/admin/login";

#[derive(Debug, PartialEq, Eq)]
enum RouteClass {
    /// Dashboard HTML, requires a session, redirects when anonymous
    DashboardPage,
    /// API write that requires a session, 401 when anonymous
    ProtectedWrite,
    /// Everything else
    Public,
}

fn classify(method: &Method, path: &str) -> RouteClass {
    if path.starts_with("/admin/dashboard") {
        return RouteClass::DashboardPage;
    }
    if method == Method::POST && (path == "/api/v1/subscriptions" || path == "/api/v1/gallery") {
        return RouteClass::ProtectedWrite;
    }
    RouteClass::Public
}

pub async fn session_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(identity) = authenticate(request.headers(), &state.session_secret) {
        request.extensions_mut().insert(identity);
        return next.run(request).await;
    }

    match classify(request.method(), request.uri().path()) {
        RouteClass::DashboardPage => Redirect::temporary(LOGIN_PAGE).into_response(),
        RouteClass::ProtectedWrite => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "message": "Unauthorized" })),
        )
            .into_response(),
        RouteClass::Public => next.run(request).await,
    }
}
