//! PostgreSQL-backed `UserRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{NewUser, UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, EmailAddress, PasswordHash, User, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed credential store.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a database row to a domain user.
///
/// Stored values were validated on the way in; a row that no longer
/// parses indicates outside interference and surfaces as a query error.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let name = DisplayName::parse(&row.name)
        .map_err(|err| UserPersistenceError::query(format!("invalid stored name: {err}")))?;
    let email = EmailAddress::parse(&row.email)
        .map_err(|err| UserPersistenceError::query(format!("invalid stored email: {err}")))?;
    Ok(User::new(
        UserId::from_uuid(row.id),
        name,
        email,
        PasswordHash::new(row.password_hash),
    ))
}

fn map_create_error(error: DieselError) -> UserPersistenceError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return UserPersistenceError::duplicate_email();
    }
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let row = NewUserRow {
            id: Uuid::new_v4(),
            name: new_user.name.as_ref(),
            email: new_user.email.as_ref(),
            password_hash: new_user.password_hash.expose(),
        };

        let inserted: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_create_error)?;

        row_to_user(inserted)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                map_diesel_error(
                    err,
                    UserPersistenceError::query,
                    UserPersistenceError::connection,
                )
            })?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                map_diesel_error(
                    err,
                    UserPersistenceError::query,
                    UserPersistenceError::connection,
                )
            })?;

        row.map(row_to_user).transpose()
    }
}
