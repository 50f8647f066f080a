//! Admin session tokens
//!
//! A session is a signed JWT carried either in the `fortafit_session` cookie
//! (set by the login endpoint for the dashboard) or as a bearer token (API
//! clients). Verification never errors out, an unusable token is simply an
//! anonymous request.

use axum::http::{HeaderMap, header};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Cookie the dashboard stores its session token in
pub const SESSION_COOKIE: &str = "fortafit_session";

pub const SESSION_EXPIRY_HOURS: i64 = 24;

/// JWT claims for an admin session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Admin user ID
    pub sub: String,
    pub email: String,
    pub name: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated admin identity extracted from a session token
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub admin_id: String,
    pub email: String,
    pub name: String,
}

/// Create a session token for an admin
pub fn create_token(
    admin_id: &str,
    email: &str,
    name: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = SessionClaims {
        sub: admin_id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        exp: (now + chrono::Duration::hours(SESSION_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a session token. Any invalid, expired or foreign-signed token is `None`.
pub fn verify_token(token: &str, secret: &str) -> Option<Authenticated> {
    let validation = Validation::default();
    let token_data = jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| tracing::debug!("Session token rejected: {e}"))
    .ok()?;

    Some(Authenticated {
        admin_id: token_data.claims.sub,
        email: token_data.claims.email,
        name: token_data.claims.name,
    })
}

/// Pull the session token out of a request. Bearer header wins over cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok())
        && let Some(token) = auth_header.strip_prefix("Bearer ")
    {
        return Some(token.to_string());
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    for cookie in cookies.split(';') {
        if let Some((name, value)) = cookie.trim().split_once('=')
            && name == SESSION_COOKIE
        {
            return Some(value.to_string());
        }
    }
    None
}

/// Resolve the request's identity, if it carries a usable session token.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Option<Authenticated> {
    let token = extract_token(headers)?;
    verify_token(&token, secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-session-secret";

    #[test]
    fn token_roundtrip() {
        let token = create_token("admin-1", "ana@fortafit.ro", "Ana", SECRET).unwrap();
        let identity = verify_token(&token, SECRET).unwrap();
        assert_eq!(identity.admin_id, "admin-1");
        assert_eq!(identity.email, "ana@fortafit.ro");
        assert_eq!(identity.name, "Ana");
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = create_token("admin-1", "ana@fortafit.ro", "Ana", "other-secret").unwrap();
        assert!(verify_token(&token, SECRET).is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Validation::default() allows 60s leeway, so push well past it
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "admin-1".into(),
            email: "ana@fortafit.ro".into(),
            name: "Ana".into(),
            exp: (now - 3700) as usize,
            iat: (now - 7300) as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(&token, SECRET).is_none());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_token("definitely.not.a-jwt", SECRET).is_none());
    }

    #[test]
    fn extract_prefers_bearer_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("fortafit_session=from-cookie"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn extract_finds_the_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; fortafit_session=tok123; lang=ro"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("tok123"));
    }

    #[test]
    fn extract_ignores_other_cookies_and_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; lang=ro"),
        );
        assert!(extract_token(&headers).is_none());

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert!(extract_token(&headers).is_none());
    }
}
