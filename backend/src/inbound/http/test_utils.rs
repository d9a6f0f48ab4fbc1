//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

/// Session middleware for unit tests: cookie-backed state, a throwaway
/// signing key, and no `Secure` flag so plain-HTTP test requests carry
/// the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    let throwaway_key = Key::generate();
    SessionMiddleware::builder(CookieSessionStore::default(), throwaway_key)
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}
