//! Port abstraction for credential-store adapters and their errors.

use async_trait::async_trait;

use crate::domain::user::{DisplayName, EmailAddress, PasswordHash, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by credential-store adapters.
    pub enum UserPersistenceError {
        /// Store connection could not be established.
        Connection { message: String } => "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user store query failed: {message}",
        /// The email address is already registered.
        DuplicateEmail => "email address already registered",
    }
}

/// Fields of a user record to be created.
///
/// The identifier is assigned by the repository so callers cannot collide
/// with existing rows.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name for the new account.
    pub name: DisplayName,
    /// Normalised unique email address.
    pub email: EmailAddress,
    /// Salted password hash; never the plaintext.
    pub password_hash: PasswordHash,
}

/// Credential store port.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record.
    ///
    /// Fails with [`UserPersistenceError::DuplicateEmail`] when the email
    /// is already registered; uniqueness is enforced by the store, not by
    /// a prior read.
    async fn create(&self, new_user: NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by normalised email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}
