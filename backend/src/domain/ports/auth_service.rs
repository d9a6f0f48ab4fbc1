//! Driving port for registration and logon use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it
//! to authenticate or register without knowing the backing stores, which
//! keeps handler tests deterministic — they substitute a test double
//! instead of wiring persistence and real hashing.

use async_trait::async_trait;

use crate::domain::credentials::{LoginCredentials, Registration};
use crate::domain::error::Error;
use crate::domain::user::User;

/// Logon failures, deliberately coarse.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    /// Unknown email or wrong password — a single undifferentiated value
    /// so callers cannot enumerate registered addresses.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// A backing service failed; carries the translated domain error.
    #[error(transparent)]
    Service(Error),
}

/// Registration failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistrationError {
    /// The email address is already registered.
    #[error("email address already registered")]
    DuplicateEmail,
    /// A backing service failed; carries the translated domain error.
    #[error(transparent)]
    Service(Error),
}

/// Domain use-case port for authentication and registration.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, AuthError>;

    /// Create a new account and return it ready for immediate logon.
    async fn register(&self, registration: &Registration) -> Result<User, RegistrationError>;
}
