//! Authentication payloads: logon credentials and registration requests.
//!
//! Keep inbound payload parsing outside the domain by exposing
//! constructors that validate string inputs before a handler talks to the
//! authentication service. Passwords are wrapped in [`Zeroizing`] so the
//! plaintext is wiped when the value is dropped.

use zeroize::Zeroizing;

use super::user::{DisplayName, EmailAddress};
use super::validation::FieldError;

/// Minimum accepted password length at registration.
const PASSWORD_MIN_LEN: usize = 6;

/// Domain error returned when logon payload values are unusable.
///
/// Handlers map every variant to the same generic failure message so the
/// logon form never discloses which part of the payload was wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Email was missing or malformed.
    #[error("email is missing or malformed")]
    BadEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated logon credentials used by the authentication service.
///
/// ## Invariants
/// - `email` is normalised (trimmed, lowercased) and well-formed.
/// - `password` is non-empty but otherwise untouched, so whitespace typed
///   by the user takes part in the comparison.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email =
            EmailAddress::parse(email).map_err(|_| CredentialsValidationError::BadEmail)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email address used for the lookup.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password exactly as submitted.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
///
/// ## Invariants
/// - `name` and `email` satisfy their value-type invariants.
/// - the password meets the minimum length and matched its confirmation
///   exactly.
#[derive(Debug, Clone)]
pub struct Registration {
    name: DisplayName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration fields, collecting every failing field.
    pub fn parse(
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = match DisplayName::parse(name) {
            Ok(name) => Some(name),
            Err(err) => {
                errors.push(FieldError::new("name", err.to_string()));
                None
            }
        };

        let email = match EmailAddress::parse(email) {
            Ok(email) => Some(email),
            Err(err) => {
                errors.push(FieldError::new("email", err.to_string()));
                None
            }
        };

        if password.chars().count() < PASSWORD_MIN_LEN {
            errors.push(FieldError::new(
                "password",
                format!("Password must be at least {PASSWORD_MIN_LEN} characters."),
            ));
        } else if password != confirm_password {
            errors.push(FieldError::new(
                "confirm_password",
                "The passwords entered do not match.",
            ));
        }

        match (name, email) {
            (Some(name), Some(email)) if errors.is_empty() => Ok(Self {
                name,
                email,
                password: Zeroizing::new(password.to_owned()),
            }),
            _ => Err(errors),
        }
    }

    /// Display name for the new account.
    #[must_use]
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Normalised email address for the new account.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password to be hashed exactly once by the service.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
