//! Backend entry-point: configuration, stores, and server start-up.

use actix_session::storage::RedisSessionStore;
use mockable::{DefaultEnv, Env};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use backend::server::{ServerConfig, bind_addr_from_env, create_server};

const DATABASE_URL_ENV: &str = "DATABASE_URL";
const SESSION_REDIS_URL_ENV: &str = "SESSION_REDIS_URL";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %err, "tracing init failed");
    }

    let env = DefaultEnv::default();
    let mode = BuildMode::from_debug_assertions();

    let settings =
        session_settings_from_env(&env, mode).map_err(std::io::Error::other)?;
    let bind_addr = bind_addr_from_env(&env).map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(
        settings.key,
        settings.cookie_secure,
        settings.same_site,
        bind_addr,
    );

    if let Some(database_url) = env.string(DATABASE_URL_ENV) {
        let migration_url = database_url.clone();
        tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
            .await
            .map_err(std::io::Error::other)?
            .map_err(std::io::Error::other)?;

        let pool = DbPool::new(PoolConfig::new(&database_url))
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    } else {
        warn!("{DATABASE_URL_ENV} not set; falling back to in-memory stores (dev only)");
    }

    if let Some(redis_url) = env.string(SESSION_REDIS_URL_ENV) {
        let store = RedisSessionStore::new(redis_url).await.map_err(|err| {
            std::io::Error::other(format!("failed to connect session store: {err}"))
        })?;
        config = config.with_redis_store(store);
    } else {
        warn!("{SESSION_REDIS_URL_ENV} not set; sessions live in the cookie (dev only)");
    }

    tracing::info!(addr = %config.bind_addr(), "starting server");
    create_server(config)?.await
}
