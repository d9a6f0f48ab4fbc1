//! Session configuration parsing and validation.
//!
//! Centralises the environment-driven session settings so they are
//! validated consistently and can be tested in isolation with a mock
//! environment. Debug builds tolerate missing toggles with a warning;
//! release builds require explicit, valid values.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";
const SAMESITE_EXPECTED: &str = "Strict|Lax";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing
    /// toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Session settings derived from configuration toggles.
pub struct SessionSettings {
    /// Signing key for session cookies.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("key", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .field("same_site", &self.same_site)
            .finish()
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Key file path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        /// Key file path.
        path: PathBuf,
        /// Observed length.
        length: usize,
        /// Required minimum.
        min_len: usize,
    },
    /// Release builds must not fall back to an ephemeral session key.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build session settings from environment variables and build mode.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = bool_from_env(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site_from_env(env, mode)?;
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let key = session_key_from_env(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn bool_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: bool,
) -> Result<bool, SessionConfigError> {
    match env.string(name) {
        Some(value) => match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None => {
                if mode.is_debug() {
                    warn!(name, %value, "invalid boolean toggle; using default");
                    Ok(default)
                } else {
                    Err(SessionConfigError::InvalidEnv {
                        name,
                        value,
                        expected: BOOL_EXPECTED,
                    })
                }
            }
        },
        None => {
            if mode.is_debug() {
                warn!(name, "toggle not set; using default");
                Ok(default)
            } else {
                Err(SessionConfigError::MissingEnv { name })
            }
        }
    }
}

fn same_site_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };

    let Some(value) = env.string(SAMESITE_ENV) else {
        if mode.is_debug() {
            warn!("SESSION_SAMESITE not set; using default");
            return Ok(default_same_site);
        }
        return Err(SessionConfigError::MissingEnv { name: SAMESITE_ENV });
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        _ => {
            if mode.is_debug() {
                warn!(%value, "invalid SESSION_SAMESITE; using default");
                Ok(default_same_site)
            } else {
                Err(SessionConfigError::InvalidEnv {
                    name: SAMESITE_ENV,
                    value,
                    expected: SAMESITE_EXPECTED,
                })
            }
        }
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SessionConfigError> {
    let allow = bool_from_env(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    Ok(allow)
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let key_path = env
        .string(KEY_FILE_ENV)
        .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned());
    let path = PathBuf::from(key_path);

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(SessionConfigError::KeyRead {
                    path,
                    source: error,
                })
            }
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;

    fn env_with(values: Vec<(&'static str, &'static str)>) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string().returning(move |name| {
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned())
        });
        env
    }

    #[rstest]
    fn debug_mode_defaults_when_unset() {
        let env = env_with(vec![]);
        let settings =
            session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults apply");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    fn release_mode_requires_toggles() {
        let env = env_with(vec![]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .expect_err("release must demand explicit settings");
        assert!(matches!(
            err,
            SessionConfigError::MissingEnv {
                name: COOKIE_SECURE_ENV
            }
        ));
    }

    #[rstest]
    fn release_mode_rejects_ephemeral_keys() {
        let key_path = std::env::temp_dir().join("missing_session_key_for_test");
        let key_file: &'static str = Box::leak(
            key_path
                .to_str()
                .expect("temp path is UTF-8")
                .to_owned()
                .into_boxed_str(),
        );
        let env = env_with(vec![
            (COOKIE_SECURE_ENV, "1"),
            (SAMESITE_ENV, "Strict"),
            (ALLOW_EPHEMERAL_ENV, "1"),
            (KEY_FILE_ENV, key_file),
        ]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .expect_err("ephemeral keys are debug-only");
        assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
    }

    #[rstest]
    #[case("1", true)]
    #[case("0", false)]
    #[case("yes", true)]
    #[case("no", false)]
    fn parses_boolean_spellings(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(parse_bool(raw), Some(expected));
    }

    #[rstest]
    fn reads_key_from_file() {
        let key_path = std::env::temp_dir().join("session_key_config_test");
        std::fs::write(&key_path, vec![b'k'; SESSION_KEY_MIN_LEN]).expect("write key file");
        let key_file: &'static str = Box::leak(
            key_path
                .to_str()
                .expect("temp path is UTF-8")
                .to_owned()
                .into_boxed_str(),
        );
        let env = env_with(vec![
            (COOKIE_SECURE_ENV, "1"),
            (SAMESITE_ENV, "Strict"),
            (ALLOW_EPHEMERAL_ENV, "0"),
            (KEY_FILE_ENV, key_file),
        ]);

        let settings =
            session_settings_from_env(&env, BuildMode::Release).expect("valid release config");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);

        std::fs::remove_file(&key_path).expect("remove key file");
    }
}
