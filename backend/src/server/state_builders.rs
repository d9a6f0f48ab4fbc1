//! Assembly of the HTTP dependency bundle from server configuration.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use crate::domain::PasswordAuthenticator;
use crate::inbound::http::state::HttpState;
use crate::outbound::BcryptPasswordHasher;
use crate::outbound::memory::{InMemoryJobRepository, InMemoryUserRepository};
use crate::outbound::persistence::{DieselJobRepository, DieselUserRepository};

use super::ServerConfig;

/// Build the handler state from configuration.
///
/// Uses the database-backed adapters when a pool is configured and falls
/// back to in-memory stores otherwise, so the application runs on a bare
/// machine during development.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let hasher = Arc::new(BcryptPasswordHasher::default());
    match &config.db_pool {
        Some(pool) => {
            let users = Arc::new(DieselUserRepository::new(pool.clone()));
            let jobs = Arc::new(DieselJobRepository::new(pool.clone()));
            let auth = PasswordAuthenticator::new(users, hasher);
            web::Data::new(HttpState::new(Arc::new(auth), jobs))
        }
        None => {
            warn!("no database configured; job and user stores are in-memory (dev only)");
            let users = Arc::new(InMemoryUserRepository::default());
            let jobs = Arc::new(InMemoryJobRepository::default());
            let auth = PasswordAuthenticator::new(users, hasher);
            web::Data::new(HttpState::new(Arc::new(auth), jobs))
        }
    }
}
