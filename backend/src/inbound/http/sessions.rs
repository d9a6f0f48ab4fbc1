//! Registration, logon, and logoff handlers.
//!
//! ```text
//! GET  /sessions/register   registration form
//! POST /sessions/register   create account, auto-logon
//! GET  /sessions/logon      logon form (redirects home when signed on)
//! POST /sessions/logon      authenticate, establish session
//! POST /sessions/logoff     destroy session (gated, CSRF-checked)
//! ```
//!
//! Logon failures are deliberately uniform: a malformed email, an unknown
//! address, and a wrong password all flash the same message, so the form
//! cannot be used to probe for registered accounts.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, get, post, web};
use askama::Template;
use serde::Deserialize;

use crate::domain::ports::{AuthError, RegistrationError};
use crate::domain::{FieldError, FlashMessage, LoginCredentials, Registration};

use super::csrf::CsrfForm;
use super::error::ApiResult;
use super::render;
use super::session::SessionContext;
use super::state::HttpState;

const LOGON_FAILED_MESSAGE: &str = "Invalid email or password.";
const DUPLICATE_EMAIL_MESSAGE: &str = "That email address is already registered.";

fn redirect_to(path: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, path))
        .finish()
}

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterPage {
    flashes: Vec<FlashMessage>,
    csrf_token: String,
    errors: Vec<FieldError>,
    name: String,
    email: String,
}

#[derive(Template)]
#[template(path = "logon.html")]
struct LogonPage {
    flashes: Vec<FlashMessage>,
    csrf_token: String,
    email: String,
}

/// Registration form body. The confirmation field never leaves the
/// handler.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Password confirmation.
    pub confirm_password: String,
}

/// Logon form body.
#[derive(Debug, Deserialize)]
pub struct LogonForm {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Form body for endpoints whose only field is the CSRF token.
#[derive(Debug, Deserialize)]
pub struct TokenOnlyForm {}

/// Render the registration form.
#[get("/register")]
pub async fn register_form(session: SessionContext) -> ApiResult<HttpResponse> {
    let page = RegisterPage {
        flashes: session.take_flashes()?,
        csrf_token: session.issue_csrf_token()?,
        errors: Vec::new(),
        name: String::new(),
        email: String::new(),
    };
    render::page(&page)
}

/// Create a user and log the new identity on in the same request.
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: CsrfForm<RegisterForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();

    let registration = match Registration::parse(
        &form.name,
        &form.email,
        &form.password,
        &form.confirm_password,
    ) {
        Ok(registration) => registration,
        Err(errors) => return rerender_register(&session, &form, errors),
    };

    match state.auth.register(&registration).await {
        Ok(user) => {
            // Fresh identifier and anti-forgery secret for the now
            // privileged session.
            session.renew();
            session.persist_user(&user)?;
            session.rotate_csrf_secret()?;
            session.push_flash(FlashMessage::info("Welcome! Your account is ready."))?;
            Ok(redirect_to("/"))
        }
        Err(RegistrationError::DuplicateEmail) => rerender_register(
            &session,
            &form,
            vec![FieldError::new("email", DUPLICATE_EMAIL_MESSAGE)],
        ),
        Err(RegistrationError::Service(error)) => Err(error),
    }
}

fn rerender_register(
    session: &SessionContext,
    form: &RegisterForm,
    errors: Vec<FieldError>,
) -> ApiResult<HttpResponse> {
    let page = RegisterPage {
        flashes: session.take_flashes()?,
        csrf_token: session.issue_csrf_token()?,
        errors,
        name: form.name.clone(),
        email: form.email.clone(),
    };
    render::page_with_status(&page, StatusCode::BAD_REQUEST)
}

/// Render the logon form, or send an already signed-on user home.
#[get("/logon")]
pub async fn logon_form(session: SessionContext) -> ApiResult<HttpResponse> {
    if session.user_id()?.is_some() {
        return Ok(redirect_to("/"));
    }
    let page = LogonPage {
        flashes: session.take_flashes()?,
        csrf_token: session.issue_csrf_token()?,
        email: String::new(),
    };
    render::page(&page)
}

/// Authenticate and establish a session.
#[post("/logon")]
pub async fn logon(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: CsrfForm<LogonForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();

    let Ok(credentials) = LoginCredentials::try_from_parts(&form.email, &form.password) else {
        return logon_failed(&session);
    };

    match state.auth.authenticate(&credentials).await {
        Ok(user) => {
            session.renew();
            session.persist_user(&user)?;
            session.rotate_csrf_secret()?;
            let destination = session.take_return_to()?.unwrap_or_else(|| "/".to_owned());
            Ok(redirect_to(&destination))
        }
        Err(AuthError::InvalidCredentials) => logon_failed(&session),
        Err(AuthError::Service(error)) => Err(error),
    }
}

fn logon_failed(session: &SessionContext) -> ApiResult<HttpResponse> {
    session.push_flash(FlashMessage::error(LOGON_FAILED_MESSAGE))?;
    Ok(redirect_to("/sessions/logon"))
}

/// Destroy the session; the CSRF secret and flash queue go with it.
///
/// Registered as a plain route so the authorization gate can wrap the
/// resource.
pub async fn logoff(
    session: SessionContext,
    _form: CsrfForm<TokenOnlyForm>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    session.purge();
    Ok(redirect_to("/"))
}

#[cfg(test)]
mod tests {
    //! Handler-level coverage with in-memory adapters; the end-to-end
    //! flows live in the integration suite.
    use std::sync::Arc;

    use super::*;
    use crate::domain::{Error, PasswordAuthenticator};
    use crate::outbound::BcryptPasswordHasher;
    use crate::outbound::memory::InMemoryUserRepository;
    use actix_web::{App, test};

    fn test_state() -> web::Data<HttpState> {
        let users = Arc::new(InMemoryUserRepository::default());
        let auth = PasswordAuthenticator::new(
            users,
            Arc::new(BcryptPasswordHasher::with_cost(4)),
        );
        web::Data::new(HttpState::new(
            Arc::new(auth),
            Arc::new(crate::outbound::memory::InMemoryJobRepository::default()),
        ))
    }

    fn test_app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(
                web::scope("/sessions")
                    .service(register_form)
                    .service(register)
                    .service(logon_form)
                    .service(logon),
            )
    }

    fn extract_csrf_token(html: &str) -> String {
        let marker = "name=\"_csrf\" value=\"";
        let start = html.find(marker).expect("token field present") + marker.len();
        let end = html[start..].find('"').expect("token terminated") + start;
        html[start..end].to_owned()
    }

    fn session_cookie(
        res: &actix_web::dev::ServiceResponse,
    ) -> actix_web::cookie::Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn register_rejects_mismatched_passwords_without_creating_user() {
        let state = test_state();
        let app = test::init_service(test_app(state.clone())).await;

        let form_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/sessions/register")
                .to_request(),
        )
        .await;
        let cookie = session_cookie(&form_res);
        let html =
            String::from_utf8(test::read_body(form_res).await.to_vec()).expect("utf8 page");
        let token = extract_csrf_token(&html);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/sessions/register")
                .cookie(cookie)
                .set_form([
                    ("_csrf", token.as_str()),
                    ("name", "Ada Lovelace"),
                    ("email", "ada@example.com"),
                    ("password", "abc123"),
                    ("confirm_password", "abc124"),
                ])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let html = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8 page");
        assert!(html.contains("The passwords entered do not match."));
        // Prior non-secret inputs are preserved.
        assert!(html.contains("value=\"Ada Lovelace\""));
        assert!(html.contains("value=\"ada@example.com\""));
    }

    #[actix_web::test]
    async fn register_without_token_is_forbidden() {
        let state = test_state();
        let app = test::init_service(test_app(state)).await;

        let form_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/sessions/register")
                .to_request(),
        )
        .await;
        let cookie = session_cookie(&form_res);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/sessions/register")
                .cookie(cookie)
                .set_form([
                    ("name", "Ada"),
                    ("email", "ada@example.com"),
                    ("password", "abc123"),
                    ("confirm_password", "abc123"),
                ])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn logon_form_redirects_home_when_already_signed_on() {
        let state = test_state();
        let app = test::init_service(
            test_app(state).route(
                "/fixture-logon",
                web::get().to(|session: SessionContext| async move {
                    session.persist_user_parts(&crate::domain::UserId::random(), "Ada")?;
                    Ok::<_, Error>(HttpResponse::Ok().finish())
                }),
            ),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/fixture-logon").to_request(),
        )
        .await;
        let cookie = session_cookie(&res);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/sessions/logon")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/")
        );
    }
}
