//! In-memory port implementations.
//!
//! Back the same ports as the Diesel adapters without any I/O. Used by
//! the test suites and as the development fallback when no database is
//! configured, so the application starts on a bare machine.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    JobPersistenceError, JobRepository, NewUser, UserPersistenceError, UserRepository,
};
use crate::domain::{EmailAddress, Job, JobDraft, JobId, User, UserId};

/// Credential store held in process memory.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, UserPersistenceError> {
        let mut users = self.users.lock().map_err(|_| poisoned_user_lock())?;
        if users.iter().any(|user| user.email() == &new_user.email) {
            return Err(UserPersistenceError::duplicate_email());
        }
        let user = User::new(
            UserId::random(),
            new_user.name,
            new_user.email,
            new_user.password_hash,
        );
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().map_err(|_| poisoned_user_lock())?;
        Ok(users.iter().find(|user| user.email() == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().map_err(|_| poisoned_user_lock())?;
        Ok(users.iter().find(|user| user.id() == id).cloned())
    }
}

fn poisoned_user_lock() -> UserPersistenceError {
    UserPersistenceError::query("user store lock poisoned")
}

/// Job store held in process memory.
///
/// Insertion order doubles as creation order, so reverse iteration gives
/// the newest-first listing the port requires even when timestamps
/// collide within one tick.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<Vec<Job>>,
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, owner: &UserId, draft: &JobDraft) -> Result<Job, JobPersistenceError> {
        let job = Job::new(JobId::random(), draft, *owner, Utc::now());
        let mut jobs = self.jobs.lock().map_err(|_| poisoned_job_lock())?;
        jobs.push(job.clone());
        Ok(job)
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Job>, JobPersistenceError> {
        let jobs = self.jobs.lock().map_err(|_| poisoned_job_lock())?;
        Ok(jobs
            .iter()
            .rev()
            .filter(|job| job.owner() == owner)
            .cloned()
            .collect())
    }

    async fn find_for_owner(
        &self,
        id: &JobId,
        owner: &UserId,
    ) -> Result<Option<Job>, JobPersistenceError> {
        let jobs = self.jobs.lock().map_err(|_| poisoned_job_lock())?;
        Ok(jobs
            .iter()
            .find(|job| job.id() == id && job.owner() == owner)
            .cloned())
    }

    async fn update_for_owner(
        &self,
        id: &JobId,
        owner: &UserId,
        draft: &JobDraft,
    ) -> Result<Option<Job>, JobPersistenceError> {
        let mut jobs = self.jobs.lock().map_err(|_| poisoned_job_lock())?;
        let Some(slot) = jobs
            .iter_mut()
            .find(|job| job.id() == id && job.owner() == owner)
        else {
            return Ok(None);
        };
        let replacement = Job::new(*slot.id(), draft, *slot.owner(), slot.created_at());
        *slot = replacement;
        Ok(Some(slot.clone()))
    }

    async fn delete_for_owner(
        &self,
        id: &JobId,
        owner: &UserId,
    ) -> Result<bool, JobPersistenceError> {
        let mut jobs = self.jobs.lock().map_err(|_| poisoned_job_lock())?;
        let before = jobs.len();
        jobs.retain(|job| !(job.id() == id && job.owner() == owner));
        Ok(jobs.len() < before)
    }
}

fn poisoned_job_lock() -> JobPersistenceError {
    JobPersistenceError::query("job store lock poisoned")
}
