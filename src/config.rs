//! Server configuration

use crate::error::BoxError;

/// How gallery uploads reach the media store.
///
/// `Direct` serves signatures and expects the browser to talk to Cloudinary
/// itself, `Mediated` accepts the files and uploads them server-side. Exactly
/// one of the two request shapes is accepted per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    Direct,
    Mediated,
}

impl UploadMode {
    fn parse(value: &str) -> Result<Self, BoxError> {
        match value {
            "direct" => Ok(UploadMode::Direct),
            "mediated" => Ok(UploadMode::Mediated),
            other => {
                Err(format!("UPLOAD_MODE must be 'direct' or 'mediated', got '{other}'").into())
            }
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret for admin sessions
    pub session_secret: String,
    /// Cloudinary account the gallery uploads to
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    /// Cloudinary API secret, also signs browser uploads
    pub cloudinary_api_secret: String,
    /// Active gallery upload path
    pub upload_mode: UploadMode,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let upload_mode = match std::env::var("UPLOAD_MODE") {
            Ok(v) => UploadMode::parse(&v)?,
            Err(_) => UploadMode::Direct,
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: environment.clone(),
            session_secret: Self::require_secret("SESSION_SECRET", &environment)?,
            cloudinary_cloud_name: Self::require_secret("CLOUDINARY_CLOUD_NAME", &environment)?,
            cloudinary_api_key: Self::require_secret("CLOUDINARY_API_KEY", &environment)?,
            cloudinary_api_secret: Self::require_secret("CLOUDINARY_API_SECRET", &environment)?,
            upload_mode,
        })
    }
}
