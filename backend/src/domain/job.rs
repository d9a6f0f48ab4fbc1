//! Job applications and their validated value types.
//!
//! A job always belongs to exactly one owner, assigned at creation and
//! immutable thereafter. Ownership enforcement happens in the repository
//! filters; this module guarantees the field invariants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;
use super::validation::FieldError;

/// Validation errors raised by [`JobId`] constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobIdValidationError {
    /// The supplied string is not a valid UUID.
    #[error("job id must be a valid UUID")]
    InvalidUuid,
}

/// Stable job identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
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
    ///
    /// A malformed identifier in a URL is indistinguishable from an
    /// unknown one, so callers map this error to a not-found outcome.
    pub fn parse(raw: &str) -> Result<Self, JobIdValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| JobIdValidationError::InvalidUuid)
    }

    /// Underlying UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application status of a tracked job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Application submitted, no decision yet.
    #[default]
    Pending,
    /// Interview scheduled or in progress.
    Interview,
    /// Application declined.
    Declined,
}

impl JobStatus {
    /// Every status in display order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Interview, Self::Declined];

    /// Wire/storage name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Interview => "interview",
            Self::Declined => "declined",
        }
    }

    /// Parse a storage or form value.
    pub fn parse(raw: &str) -> Result<Self, JobStatusParseError> {
        match raw {
            "pending" => Ok(Self::Pending),
            "interview" => Ok(Self::Interview),
            "declined" => Ok(Self::Declined),
            _ => Err(JobStatusParseError::Unknown),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a status value is outside the allowed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobStatusParseError {
    /// The value matches no known status.
    #[error("status must be one of pending, interview, declined")]
    Unknown,
}

/// Validated mutable fields of a job, as submitted through a form.
///
/// ## Invariants
/// - `company` and `position` are trimmed and non-empty.
/// - `status` is one of the allowed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDraft {
    company: String,
    position: String,
    status: JobStatus,
}

impl JobDraft {
    /// Validate raw form fields, collecting every failing field.
    pub fn parse(company: &str, position: &str, status: &str) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let company = company.trim();
        if company.is_empty() {
            errors.push(FieldError::new("company", "Company is required."));
        }

        let position = position.trim();
        if position.is_empty() {
            errors.push(FieldError::new("position", "Position is required."));
        }

        let status = match JobStatus::parse(status) {
            Ok(status) => status,
            Err(err) => {
                errors.push(FieldError::new("status", err.to_string()));
                JobStatus::default()
            }
        };

        if errors.is_empty() {
            Ok(Self {
                company: company.to_owned(),
                position: position.to_owned(),
                status,
            })
        } else {
            Err(errors)
        }
    }

    /// Company the application was sent to.
    #[must_use]
    pub fn company(&self) -> &str {
        self.company.as_str()
    }

    /// Position applied for.
    #[must_use]
    pub fn position(&self) -> &str {
        self.position.as_str()
    }

    /// Current application status.
    #[must_use]
    pub fn status(&self) -> JobStatus {
        self.status
    }
}

/// Persisted job application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    id: JobId,
    company: String,
    position: String,
    status: JobStatus,
    owner: UserId,
    created_at: DateTime<Utc>,
}

impl Job {
    /// Assemble a job from validated parts.
    #[must_use]
    pub fn new(id: JobId, draft: &JobDraft, owner: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            company: draft.company().to_owned(),
            position: draft.position().to_owned(),
            status: draft.status(),
            owner,
            created_at,
        }
    }

    /// Reconstruct a job from storage fields already known to be valid.
    #[must_use]
    pub fn from_parts(
        id: JobId,
        company: String,
        position: String,
        status: JobStatus,
        owner: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            company,
            position,
            status,
            owner,
            created_at,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> &JobId {
        &self.id
    }

    /// Company the application was sent to.
    #[must_use]
    pub fn company(&self) -> &str {
        self.company.as_str()
    }

    /// Position applied for.
    #[must_use]
    pub fn position(&self) -> &str {
        self.position.as_str()
    }

    /// Current application status.
    #[must_use]
    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Owning user; assigned at creation and never reassigned.
    #[must_use]
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Creation timestamp used for newest-first listings.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
