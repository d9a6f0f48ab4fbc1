//! Actix middleware shared across the application.

pub mod require_auth;
pub mod trace;

pub use require_auth::RequireAuth;
pub use trace::Trace;
