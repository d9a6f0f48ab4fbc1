//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend
//! only on domain ports and remain testable without I/O. The bundle is
//! assembled once at startup from explicit configuration; no component
//! reaches for ambient globals.

use std::sync::Arc;

use crate::domain::ports::{AuthService, JobRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration and logon use-cases.
    pub auth: Arc<dyn AuthService>,
    /// Ownership-scoped job store.
    pub jobs: Arc<dyn JobRepository>,
}

impl HttpState {
    /// Construct state from its ports.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthService>, jobs: Arc<dyn JobRepository>) -> Self {
        Self { auth, jobs }
    }
}
