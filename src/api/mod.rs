//! API routes for fortafit-server

pub mod admin;
pub mod auth;
pub mod gallery;
pub mod health;
pub mod subscriptions;

use axum::routing::{delete, get, post};
use axum::{Router, extract::DefaultBodyLimit, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::session_gate;
use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Marketing content (public reads) and admin mutations share these paths;
    // the session gate decides which requests need an authenticated admin
    let content = Router::new()
        .route(
            "/api/v1/subscriptions",
            get(subscriptions::list_plans).post(subscriptions::create_plan),
        )
        .route(
            "/api/v1/subscriptions/{id}",
            get(subscriptions::get_plan)
                .put(subscriptions::update_plan)
                .delete(subscriptions::delete_plan),
        )
        .route(
            "/api/v1/gallery",
            get(gallery::list_images).post(gallery::create_images),
        )
        .route("/api/v1/gallery/{id}", delete(gallery::delete_image))
        .route("/api/v1/cloudinary-sign", get(gallery::sign_upload));

    // Admin accounts and sessions
    let sessions = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/session", get(auth::session));

    // Admin pages (anonymous dashboard visits bounce to the login page)
    let pages = Router::new()
        .route("/admin/login", get(admin::login_page))
        .route("/admin/dashboard", get(admin::dashboard_page))
        .route("/admin/dashboard/{*rest}", get(admin::dashboard_page));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(content)
        .merge(sessions)
        .merge(pages)
        .layer(middleware::from_fn_with_state(state.clone(), session_gate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Room for five 5 MiB files plus multipart framing
        .layer(DefaultBodyLimit::max(30 * 1024 * 1024))
        .with_state(state)
}
