//! fortafit-server — marketing and admin backend for the FortaFit gym
//!
//! Long-running HTTP service that:
//! - Serves subscription plans and the photo gallery to the public site
//! - Lets authenticated admins manage both (JWT session cookie)
//! - Signs browser-direct Cloudinary uploads, or relays uploads itself

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod media;
pub mod state;
pub mod util;
pub mod validation;

// Re-export the types the binary and integration tests reach for
pub use config::{Config, UploadMode};
pub use error::{ApiResult, AppError, BoxError};
pub use state::AppState;
