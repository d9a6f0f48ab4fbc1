//! Anti-forgery secret and token handling.
//!
//! The session carries a long-lived random secret; every rendered form
//! embeds a short-lived token derived from it. A token is `salt.digest`
//! with `digest = SHA-256(salt "." secret)`, so tokens differ per view
//! while any token minted under the current secret stays valid — a stale
//! tab still submits successfully until the secret rotates.
//!
//! State-changing handlers take their payload through [`CsrfForm`], which
//! validates the `_csrf` field against the session secret before the body
//! is deserialised. Absence or mismatch fails with `403 Forbidden` and a
//! generic message; handlers never see the payload.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use rand::RngCore;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::domain::Error;

use super::session::SessionContext;

/// Hidden form field carrying the per-view token.
pub const CSRF_FIELD: &str = "_csrf";

const SECRET_LEN: usize = 32;
const SALT_LEN: usize = 8;

/// Generate a fresh session secret (hex-encoded random bytes).
#[must_use]
pub fn generate_secret() -> String {
    let mut bytes = [0_u8; SECRET_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Derive a per-view token from the session secret.
#[must_use]
pub fn derive_token(secret: &str) -> String {
    let mut salt_bytes = [0_u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = hex::encode(salt_bytes);
    let digest = token_digest(&salt, secret);
    format!("{salt}.{digest}")
}

/// Check a submitted token against the session secret.
///
/// The comparison happens on hashes of both sides rather than the raw
/// strings, so comparison timing reveals nothing about the expected
/// value.
#[must_use]
pub fn verify_token(secret: &str, token: &str) -> bool {
    let Some((salt, submitted_digest)) = token.split_once('.') else {
        return false;
    };
    let expected_digest = token_digest(salt, secret);
    Sha256::digest(submitted_digest.as_bytes()) == Sha256::digest(expected_digest.as_bytes())
}

fn token_digest(salt: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b".");
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn csrf_rejection() -> Error {
    Error::forbidden("Invalid or missing CSRF token. Please refresh the page and try again.")
}

#[derive(Deserialize)]
struct TokenField {
    #[serde(rename = "_csrf")]
    csrf: Option<String>,
}

/// Urlencoded form extractor that enforces CSRF validation first.
///
/// Reads the whole body, checks the [`CSRF_FIELD`] value against the
/// session secret, and only then deserialises the payload into `T`.
pub struct CsrfForm<T>(pub T);

impl<T> CsrfForm<T> {
    /// Consume the wrapper and return the validated payload.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for CsrfForm<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from(req);
        let body = web::Bytes::from_request(req, payload);
        Box::pin(async move {
            let bytes = body
                .await
                .map_err(|err| Error::invalid_request(format!("unreadable form body: {err}")))?;

            let TokenField { csrf } = serde_urlencoded::from_bytes(&bytes)
                .map_err(|err| Error::invalid_request(format!("malformed form body: {err}")))?;
            let token = csrf.ok_or_else(csrf_rejection)?;
            let secret = session.csrf_secret()?.ok_or_else(csrf_rejection)?;
            if !verify_token(&secret, &token) {
                return Err(csrf_rejection());
            }

            let value = serde_urlencoded::from_bytes::<T>(&bytes)
                .map_err(|err| Error::invalid_request(format!("malformed form body: {err}")))?;
            Ok(Self(value))
        })
    }
}
