//! User identity and its validated value types.
//!
//! Keep inbound payload parsing outside the domain by exposing
//! constructors that validate string inputs before anything talks to a
//! port. Invariants live here; adapters only move validated values
//! around.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on display name length, matching the column width.
const DISPLAY_NAME_MAX_LEN: usize = 64;

/// Validation errors raised by [`UserId`] constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdValidationError {
    /// The supplied string is not a valid UUID.
    #[error("user id must be a valid UUID")]
    InvalidUuid,
}

/// Stable user identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse an identifier from its canonical string form.
    pub fn parse(raw: &str) -> Result<Self, UserIdValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserIdValidationError::InvalidUuid)
    }

    /// Underlying UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors raised by [`EmailAddress`] constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// The address was empty once trimmed.
    #[error("email must not be empty")]
    Empty,
    /// The address lacks a local part or domain around a single `@`.
    #[error("email must be a valid address")]
    Malformed,
}

/// Normalised email address.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace and lowercased, so lookups are
///   consistent regardless of how the address was typed.
/// - Contains exactly one `@` with a non-empty local part and a domain
///   containing at least one `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate a raw address.
    pub fn parse(raw: &str) -> Result<Self, EmailValidationError> {
        let normalised = raw.trim().to_ascii_lowercase();
        if normalised.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        let Some((local, domain)) = normalised.split_once('@') else {
            return Err(EmailValidationError::Malformed);
        };
        if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.contains('@') {
            return Err(EmailValidationError::Malformed);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors raised by [`DisplayName`] constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisplayNameValidationError {
    /// The name was empty once trimmed.
    #[error("name must not be empty")]
    Empty,
    /// The name exceeds the storage width.
    #[error("name must be at most {DISPLAY_NAME_MAX_LEN} characters")]
    TooLong,
}

/// Display name shown on rendered pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Trim and validate a raw name.
    pub fn parse(raw: &str) -> Result<Self, DisplayNameValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DisplayNameValidationError::Empty);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX_LEN {
            return Err(DisplayNameValidationError::TooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque salted password hash.
///
/// The raw hash string never appears in debug output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a password hasher.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash string for verification or storage.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Registered application user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: DisplayName,
    email: EmailAddress,
    password_hash: PasswordHash,
}

impl User {
    /// Assemble a user from validated parts.
    #[must_use]
    pub fn new(id: UserId, name: DisplayName, email: EmailAddress, password_hash: PasswordHash) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Normalised email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored password hash.
    #[must_use]
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}
