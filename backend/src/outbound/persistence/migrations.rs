//! Embedded schema migrations.
//!
//! Migrations are compiled into the binary and applied at startup over a
//! synchronous connection; the server does not begin accepting requests
//! until the schema is current.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// All migrations under `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Could not connect to the database.
    #[error("failed to connect for migrations: {message}")]
    Connect {
        /// Underlying failure description.
        message: String,
    },
    /// A migration failed to apply.
    #[error("failed to run migrations: {message}")]
    Run {
        /// Underlying failure description.
        message: String,
    },
}

/// Apply every pending migration, returning how many ran.
///
/// Blocking; call from a blocking context (e.g. `spawn_blocking`) during
/// startup.
pub fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| {
        MigrationError::Connect {
            message: err.to_string(),
        }
    })?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Run {
            message: err.to_string(),
        })?;

    if !applied.is_empty() {
        info!(count = applied.len(), "applied pending migrations");
    }
    Ok(applied.len())
}
