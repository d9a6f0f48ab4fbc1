//! Bcrypt adapter for the password-hasher port.
//!
//! Bcrypt hashing is deliberately slow, so both operations run on the
//! blocking thread pool rather than the async executor. Verification is
//! constant-time within the bcrypt implementation.

use async_trait::async_trait;
use tokio::task;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// [`PasswordHasher`] backed by the bcrypt crate.
#[derive(Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher with an explicit cost factor. Tests use a low cost to keep
    /// suites fast; production uses the default.
    #[must_use]
    pub const fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

fn hashing_error(err: impl std::fmt::Display) -> PasswordHashError {
    PasswordHashError::hashing(err.to_string())
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let password = password.to_owned();
        let cost = self.cost;
        task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(hashing_error)?
            .map_err(hashing_error)
    }

    async fn verify(
        &self,
        password: &str,
        encoded_hash: &str,
    ) -> Result<bool, PasswordHashError> {
        let password = password.to_owned();
        let encoded_hash = encoded_hash.to_owned();
        task::spawn_blocking(move || bcrypt::verify(password, &encoded_hash))
            .await
            .map_err(hashing_error)?
            .map_err(hashing_error)
    }
}
