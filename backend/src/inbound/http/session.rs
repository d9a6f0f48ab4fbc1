//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session in domain-friendly operations: persisting the
//! authenticated identity, the one-shot flash queue, the CSRF secret, and
//! the post-logon return path. All state is request-scoped; nothing here
//! touches process-wide mutable state.

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, FlashMessage, User, UserId};

use super::csrf;

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USER_NAME_KEY: &str = "user_name";
pub(crate) const FLASH_KEY: &str = "flash";
pub(crate) const CSRF_SECRET_KEY: &str = "csrf_secret";
pub(crate) const RETURN_TO_KEY: &str = "return_to";

fn session_write_error(err: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to persist session: {err}"))
}

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's identity in the session.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.persist_user_parts(user.id(), user.name().as_ref())
    }

    /// Persist identity parts directly; used where no full [`User`] is at
    /// hand.
    pub fn persist_user_parts(&self, id: &UserId, name: &str) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, id)
            .map_err(session_write_error)?;
        self.0
            .insert(USER_NAME_KEY, name)
            .map_err(session_write_error)
    }

    /// Fetch the current user id, if any.
    ///
    /// A value that fails to deserialise is treated like a forged cookie:
    /// logged and ignored, never an error.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        match self.0.get::<UserId>(USER_ID_KEY) {
            Ok(id) => Ok(id),
            Err(error) => {
                warn!(%error, "invalid user id in session; treating as anonymous");
                Ok(None)
            }
        }
    }

    /// Display name cached at logon for page rendering.
    pub fn user_name(&self) -> Result<Option<String>, Error> {
        match self.0.get::<String>(USER_NAME_KEY) {
            Ok(name) => Ok(name),
            Err(error) => {
                warn!(%error, "invalid user name in session; ignoring");
                Ok(None)
            }
        }
    }

    /// Require an authenticated user id or fail with `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("logon required"))
    }

    /// Append a flash message to the session queue.
    pub fn push_flash(&self, flash: FlashMessage) -> Result<(), Error> {
        let mut queue = self.peek_flashes();
        queue.push(flash);
        self.0
            .insert(FLASH_KEY, queue)
            .map_err(session_write_error)
    }

    /// Drain the flash queue: returns every queued message and clears the
    /// queue so each message renders exactly once.
    pub fn take_flashes(&self) -> Result<Vec<FlashMessage>, Error> {
        let queue = self.peek_flashes();
        if !queue.is_empty() {
            self.0.remove(FLASH_KEY);
        }
        Ok(queue)
    }

    fn peek_flashes(&self) -> Vec<FlashMessage> {
        match self.0.get::<Vec<FlashMessage>>(FLASH_KEY) {
            Ok(queue) => queue.unwrap_or_default(),
            Err(error) => {
                warn!(%error, "invalid flash queue in session; dropping");
                Vec::new()
            }
        }
    }

    /// Current CSRF secret, if one has been issued.
    pub fn csrf_secret(&self) -> Result<Option<String>, Error> {
        match self.0.get::<String>(CSRF_SECRET_KEY) {
            Ok(secret) => Ok(secret),
            Err(error) => {
                warn!(%error, "invalid CSRF secret in session; ignoring");
                Ok(None)
            }
        }
    }

    /// Return the CSRF secret, creating one when the session has none.
    pub fn ensure_csrf_secret(&self) -> Result<String, Error> {
        if let Some(secret) = self.csrf_secret()? {
            return Ok(secret);
        }
        self.rotate_csrf_secret()
    }

    /// Replace the CSRF secret, invalidating every previously issued
    /// token. Called when the authentication state changes.
    pub fn rotate_csrf_secret(&self) -> Result<String, Error> {
        let secret = csrf::generate_secret();
        self.0
            .insert(CSRF_SECRET_KEY, &secret)
            .map_err(session_write_error)?;
        Ok(secret)
    }

    /// Derive a fresh per-view token from the session's CSRF secret,
    /// issuing the secret first when absent.
    pub fn issue_csrf_token(&self) -> Result<String, Error> {
        let secret = self.ensure_csrf_secret()?;
        Ok(csrf::derive_token(&secret))
    }

    /// Record the path to return to after a successful logon.
    pub fn set_return_to(&self, path: &str) -> Result<(), Error> {
        self.0
            .insert(RETURN_TO_KEY, path)
            .map_err(session_write_error)
    }

    /// Consume the stored return path; it is used at most once.
    pub fn take_return_to(&self) -> Result<Option<String>, Error> {
        match self.0.get::<String>(RETURN_TO_KEY) {
            Ok(path) => {
                if path.is_some() {
                    self.0.remove(RETURN_TO_KEY);
                }
                Ok(path)
            }
            Err(error) => {
                warn!(%error, "invalid return path in session; ignoring");
                self.0.remove(RETURN_TO_KEY);
                Ok(None)
            }
        }
    }

    /// Assign a fresh session identifier, keeping the state. Called at
    /// privilege changes to prevent session fixation.
    pub fn renew(&self) {
        self.0.renew();
    }

    /// Destroy the session entirely: identity, CSRF secret, and flash
    /// queue all go with it.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// Convenience for call sites holding only an `HttpRequest`.
impl From<&HttpRequest> for SessionContext {
    fn from(req: &HttpRequest) -> Self {
        Self::new(req.get_session())
    }
}
