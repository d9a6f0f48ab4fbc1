//! Shared helpers for the integration suites.
//!
//! Drives the production application wiring (`server::build_app`)
//! against in-memory stores, a cheap bcrypt cost, and a cookie-backed
//! session middleware suitable for plain-HTTP test requests.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web};

use backend::domain::PasswordAuthenticator;
use backend::inbound::http::state::HttpState;
use backend::outbound::BcryptPasswordHasher;
use backend::outbound::memory::{InMemoryJobRepository, InMemoryUserRepository};

/// Handles to the stores behind the app, for seeding and inspection.
pub struct TestStores {
    pub users: Arc<InMemoryUserRepository>,
    pub jobs: Arc<InMemoryJobRepository>,
}

/// Build handler state backed by fresh in-memory stores.
pub fn test_state() -> (web::Data<HttpState>, TestStores) {
    let users = Arc::new(InMemoryUserRepository::default());
    let jobs = Arc::new(InMemoryJobRepository::default());
    let auth = PasswordAuthenticator::new(
        users.clone(),
        Arc::new(BcryptPasswordHasher::with_cost(4)),
    );
    let state = web::Data::new(HttpState::new(Arc::new(auth), jobs.clone()));
    (state, TestStores { users, jobs })
}

/// Session middleware for tests: fresh key, `Secure` disabled.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Call the service, updating the session cookie jar from the response.
pub async fn call(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    req: Request,
    jar: &mut Option<Cookie<'static>>,
) -> ServiceResponse {
    let res = test::call_service(app, req).await;
    if let Some(cookie) = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
    {
        *jar = Some(cookie.into_owned());
    }
    res
}

/// GET a page, returning its body as a string.
pub async fn get_page(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    path: &str,
    jar: &mut Option<Cookie<'static>>,
) -> (actix_web::http::StatusCode, String) {
    let mut req = test::TestRequest::get().uri(path);
    if let Some(cookie) = jar.clone() {
        req = req.cookie(cookie);
    }
    let res = call(app, req.to_request(), jar).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8(body.to_vec()).expect("utf8 page"))
}

/// POST a urlencoded form, returning the raw response.
pub async fn post_form(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    path: &str,
    fields: &[(&str, &str)],
    jar: &mut Option<Cookie<'static>>,
) -> ServiceResponse {
    let mut req = test::TestRequest::post().uri(path).set_form(fields);
    if let Some(cookie) = jar.clone() {
        req = req.cookie(cookie);
    }
    call(app, req.to_request(), jar).await
}

/// Pull the hidden CSRF token out of a rendered form.
pub fn extract_csrf_token(html: &str) -> String {
    let marker = "name=\"_csrf\" value=\"";
    let start = html.find(marker).expect("token field present") + marker.len();
    let end = html[start..].find('"').expect("token terminated") + start;
    html[start..end].to_owned()
}

/// Register an account through the HTTP surface; the jar ends up signed
/// on as the new user.
pub async fn register_user(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    jar: &mut Option<Cookie<'static>>,
    name: &str,
    email: &str,
    password: &str,
) {
    let (_, html) = get_page(app, "/sessions/register", jar).await;
    let token = extract_csrf_token(&html);
    let res = post_form(
        app,
        "/sessions/register",
        &[
            ("_csrf", token.as_str()),
            ("name", name),
            ("email", email),
            ("password", password),
            ("confirm_password", password),
        ],
        jar,
    )
    .await;
    assert_eq!(
        res.status(),
        actix_web::http::StatusCode::SEE_OTHER,
        "registration should redirect"
    );
}

/// Location header of a redirect response.
pub fn location_of(res: &ServiceResponse) -> String {
    res.headers()
        .get(actix_web::http::header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
        .to_owned()
}
