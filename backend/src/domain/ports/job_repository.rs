//! Port abstraction for the ownership-scoped job store.
//!
//! Every operation takes the requesting owner and filters on it, so a job
//! belonging to another user is indistinguishable from a missing one.
//! Update and delete are single conditional statements at the store — the
//! compound `(id AND owner)` filter is applied atomically with the write,
//! never as a separate read-then-write.

use async_trait::async_trait;

use crate::domain::job::{Job, JobDraft, JobId};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by job-store adapters.
    pub enum JobPersistenceError {
        /// Store connection could not be established.
        Connection { message: String } => "job store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "job store query failed: {message}",
    }
}

/// Ownership-scoped job store port.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Create a job owned by `owner`, stamping id and creation time.
    async fn create(&self, owner: &UserId, draft: &JobDraft)
    -> Result<Job, JobPersistenceError>;

    /// List the owner's jobs, newest first.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Job>, JobPersistenceError>;

    /// Fetch one job by `(id AND owner)`; `None` covers both a missing
    /// job and one held by a different owner.
    async fn find_for_owner(
        &self,
        id: &JobId,
        owner: &UserId,
    ) -> Result<Option<Job>, JobPersistenceError>;

    /// Apply `draft` to the job matching `(id AND owner)` in one
    /// conditional update; `None` when nothing matched.
    async fn update_for_owner(
        &self,
        id: &JobId,
        owner: &UserId,
        draft: &JobDraft,
    ) -> Result<Option<Job>, JobPersistenceError>;

    /// Delete the job matching `(id AND owner)` in one conditional
    /// delete; `false` when nothing matched.
    async fn delete_for_owner(
        &self,
        id: &JobId,
        owner: &UserId,
    ) -> Result<bool, JobPersistenceError>;
}
