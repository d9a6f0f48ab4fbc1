//! Server construction and middleware wiring.
//!
//! One consolidated pipeline: trace identifier, security headers, session
//! resolution, then per-scope authorization gating, with CSRF validation
//! applied at the form extractors inside the handlers.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerConfigError, bind_addr_from_env};

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::{CookieSessionStore, SessionStore};
use actix_session::SessionMiddleware;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};

use crate::inbound::http::state::HttpState;
use crate::inbound::http::{jobs, pages, sessions};
use crate::middleware::{RequireAuth, Trace};
use state_builders::build_http_state;

/// Session cookie parameters shared by every worker.
#[derive(Clone)]
struct SessionParams {
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    content_security: CookieContentSecurity,
}

fn session_middleware<S: SessionStore>(store: S, params: &SessionParams) -> SessionMiddleware<S> {
    SessionMiddleware::builder(store, params.key.clone())
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(params.cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(params.content_security)
        .cookie_same_site(params.same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::hours(2)))
        .build()
}

fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "same-origin"))
}

/// Assemble the application: routes, state, and the middleware pipeline.
///
/// Public so the integration suite can drive the exact production wiring
/// against test stores and a test session middleware.
pub fn build_app<S>(
    state: web::Data<HttpState>,
    session: SessionMiddleware<S>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: SessionStore + 'static,
{
    let sessions_scope = web::scope("/sessions")
        .service(sessions::register_form)
        .service(sessions::register)
        .service(sessions::logon_form)
        .service(sessions::logon)
        .service(
            web::resource("/logoff")
                .wrap(RequireAuth)
                .route(web::post().to(sessions::logoff)),
        );

    let jobs_scope = web::scope("/jobs")
        .wrap(RequireAuth)
        .service(jobs::list_jobs)
        .service(jobs::new_job_form)
        .service(jobs::create_job)
        .service(jobs::edit_job_form)
        .service(jobs::update_job)
        .service(jobs::delete_job);

    App::new()
        .app_data(state)
        .service(pages::home)
        .service(sessions_scope)
        .service(jobs_scope)
        .default_service(web::route().to(pages::not_found))
        .wrap(session)
        .wrap(security_headers())
        .wrap(Trace)
}

fn spawn_server<S, F>(
    state: web::Data<HttpState>,
    params: SessionParams,
    store_factory: F,
    bind_addr: std::net::SocketAddr,
) -> std::io::Result<Server>
where
    S: SessionStore + 'static,
    F: Fn() -> S + Clone + Send + 'static,
{
    let server = HttpServer::new(move || {
        build_app(
            state.clone(),
            session_middleware(store_factory(), &params),
        )
    })
    .bind(bind_addr)?
    .run();
    Ok(server)
}

/// Construct an Actix HTTP server from the provided configuration.
///
/// With a Redis store configured the cookie carries only the signed
/// opaque session id and the state lives server-side; otherwise the whole
/// session rides in an encrypted cookie (development fallback).
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
        redis_store,
    } = config;

    match redis_store {
        Some(store) => {
            let params = SessionParams {
                key,
                cookie_secure,
                same_site,
                content_security: CookieContentSecurity::Signed,
            };
            spawn_server(state, params, move || store.clone(), bind_addr)
        }
        None => {
            let params = SessionParams {
                key,
                cookie_secure,
                same_site,
                content_security: CookieContentSecurity::Private,
            };
            spawn_server(state, params, CookieSessionStore::default, bind_addr)
        }
    }
}
