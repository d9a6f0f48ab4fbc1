//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_session::storage::RedisSessionStore;
use actix_web::cookie::{Key, SameSite};
use mockable::Env;

use crate::outbound::persistence::DbPool;

const BIND_ENV: &str = "HTTP_BIND";
const BIND_DEFAULT: &str = "0.0.0.0:8080";

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) redis_store: Option<RedisSessionStore>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            redis_store: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one the server falls back to in-memory stores, which is
    /// suitable for development and tests only.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach a Redis session store for durable server-side sessions.
    ///
    /// Without one sessions live entirely in the (signed, encrypted)
    /// cookie.
    #[must_use]
    pub fn with_redis_store(mut self, store: RedisSessionStore) -> Self {
        self.redis_store = Some(store);
        self
    }

    /// The socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

/// Errors raised while reading server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ServerConfigError {
    /// `HTTP_BIND` is present but not a socket address.
    #[error("invalid value for {BIND_ENV}='{value}': {message}")]
    InvalidBind {
        /// Rejected value.
        value: String,
        /// Parse failure description.
        message: String,
    },
}

/// Read the bind address from the environment, defaulting to port 8080 on
/// all interfaces.
pub fn bind_addr_from_env<E: Env>(env: &E) -> Result<SocketAddr, ServerConfigError> {
    let raw = env.string(BIND_ENV).unwrap_or_else(|| BIND_DEFAULT.to_owned());
    raw.parse()
        .map_err(|err: std::net::AddrParseError| ServerConfigError::InvalidBind {
            value: raw,
            message: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;

    fn env_returning(value: Option<&'static str>) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string()
            .returning(move |_| value.map(str::to_owned));
        env
    }

    #[rstest]
    fn defaults_to_all_interfaces() {
        let env = env_returning(None);
        let addr = bind_addr_from_env(&env).expect("default parses");
        assert_eq!(addr.port(), 8080);
    }

    #[rstest]
    fn accepts_explicit_address() {
        let env = env_returning(Some("127.0.0.1:3000"));
        let addr = bind_addr_from_env(&env).expect("explicit address parses");
        assert_eq!(addr.port(), 3000);
        assert!(addr.ip().is_loopback());
    }

    #[rstest]
    #[case("not-an-address")]
    #[case("127.0.0.1")]
    fn rejects_malformed_addresses(#[case] raw: &'static str) {
        let env = env_returning(Some(raw));
        let err = bind_addr_from_env(&env).expect_err("malformed bind must fail");
        assert!(matches!(err, ServerConfigError::InvalidBind { .. }));
    }
}
