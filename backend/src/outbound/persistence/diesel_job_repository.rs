//! PostgreSQL-backed `JobRepository` implementation using Diesel.
//!
//! Update and delete are single conditional statements filtered by
//! `(id AND created_by)`. The database applies the filter atomically with
//! the write, which is the sole mechanism preventing lost updates and
//! cross-owner races when concurrent requests target the same job.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{JobPersistenceError, JobRepository};
use crate::domain::{Job, JobDraft, JobId, JobStatus, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{JobChangeset, JobRow, NewJobRow};
use super::pool::DbPool;
use super::schema::jobs;

/// Diesel-backed ownership-scoped job store.
#[derive(Clone)]
pub struct DieselJobRepository {
    pool: DbPool,
}

impl DieselJobRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn conn(
        &self,
    ) -> Result<
        diesel_async::pooled_connection::bb8::PooledConnection<'_, diesel_async::AsyncPgConnection>,
        JobPersistenceError,
    > {
        self.pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, JobPersistenceError::connection))
    }
}

fn map_query_error(error: diesel::result::Error) -> JobPersistenceError {
    map_diesel_error(
        error,
        JobPersistenceError::query,
        JobPersistenceError::connection,
    )
}

/// Convert a database row to a domain job.
fn row_to_job(row: JobRow) -> Result<Job, JobPersistenceError> {
    let status = JobStatus::parse(&row.status)
        .map_err(|err| JobPersistenceError::query(format!("invalid stored status: {err}")))?;
    Ok(Job::from_parts(
        JobId::from_uuid(row.id),
        row.company,
        row.position,
        status,
        UserId::from_uuid(row.created_by),
        row.created_at,
    ))
}

#[async_trait]
impl JobRepository for DieselJobRepository {
    async fn create(&self, owner: &UserId, draft: &JobDraft) -> Result<Job, JobPersistenceError> {
        let mut conn = self.conn().await?;

        let row = NewJobRow {
            id: JobId::random().as_uuid(),
            company: draft.company(),
            position: draft.position(),
            status: draft.status().as_str(),
            created_by: owner.as_uuid(),
        };

        let inserted: JobRow = diesel::insert_into(jobs::table)
            .values(&row)
            .returning(JobRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_query_error)?;

        row_to_job(inserted)
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Job>, JobPersistenceError> {
        let mut conn = self.conn().await?;

        let rows: Vec<JobRow> = jobs::table
            .filter(jobs::created_by.eq(owner.as_uuid()))
            .order(jobs::created_at.desc())
            .select(JobRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;

        rows.into_iter().map(row_to_job).collect()
    }

    async fn find_for_owner(
        &self,
        id: &JobId,
        owner: &UserId,
    ) -> Result<Option<Job>, JobPersistenceError> {
        let mut conn = self.conn().await?;

        let row: Option<JobRow> = jobs::table
            .filter(
                jobs::id
                    .eq(id.as_uuid())
                    .and(jobs::created_by.eq(owner.as_uuid())),
            )
            .select(JobRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;

        row.map(row_to_job).transpose()
    }

    async fn update_for_owner(
        &self,
        id: &JobId,
        owner: &UserId,
        draft: &JobDraft,
    ) -> Result<Option<Job>, JobPersistenceError> {
        let mut conn = self.conn().await?;

        let changeset = JobChangeset {
            company: draft.company(),
            position: draft.position(),
            status: draft.status().as_str(),
        };

        let row: Option<JobRow> = diesel::update(
            jobs::table.filter(
                jobs::id
                    .eq(id.as_uuid())
                    .and(jobs::created_by.eq(owner.as_uuid())),
            ),
        )
        .set(&changeset)
        .returning(JobRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_query_error)?;

        row.map(row_to_job).transpose()
    }

    async fn delete_for_owner(
        &self,
        id: &JobId,
        owner: &UserId,
    ) -> Result<bool, JobPersistenceError> {
        let mut conn = self.conn().await?;

        let deleted = diesel::delete(
            jobs::table.filter(
                jobs::id
                    .eq(id.as_uuid())
                    .and(jobs::created_by.eq(owner.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_query_error)?;

        Ok(deleted > 0)
    }
}
