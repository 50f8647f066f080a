//! Admin session authentication

pub mod middleware;
pub mod session;

pub use middleware::session_gate;
pub use session::{Authenticated, SESSION_COOKIE, authenticate, create_token, verify_token};
