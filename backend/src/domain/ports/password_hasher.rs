//! Port abstraction for password hashing.
//!
//! Hashing is a port so handler and service tests can substitute a cheap
//! fake instead of paying the real work factor, and so the CPU-heavy
//! adapter can shift work off the async executor without the domain
//! knowing.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password-hash adapters.
    pub enum PasswordHashError {
        /// Hashing or verification could not be performed.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Salted one-way password hashing port.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Verify a plaintext password against a stored hash.
    ///
    /// The comparison must not leak where the password diverges from the
    /// stored value through timing.
    async fn verify(&self, password: &str, encoded_hash: &str)
    -> Result<bool, PasswordHashError>;
}
