//! Domain entities, value types, and use-case services.
//!
//! Purpose: define strongly typed domain values used by the HTTP and
//! persistence adapters. Types are immutable once constructed and
//! document their invariants in Rustdoc; adapters never bypass the
//! validating constructors.

pub mod authentication;
pub mod credentials;
pub mod error;
pub mod flash;
pub mod job;
pub mod ports;
pub mod user;
pub mod validation;

pub use self::authentication::PasswordAuthenticator;
pub use self::credentials::{CredentialsValidationError, LoginCredentials, Registration};
pub use self::error::{Error, ErrorCode};
pub use self::flash::{FlashKind, FlashMessage};
pub use self::job::{Job, JobDraft, JobId, JobStatus};
pub use self::user::{DisplayName, EmailAddress, PasswordHash, User, UserId};
pub use self::validation::FieldError;

/// Convenient result alias for fallible domain and handler code.
pub type ApiResult<T> = Result<T, Error>;
