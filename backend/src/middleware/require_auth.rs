//! Authorization gate for protected routes.
//!
//! Wrapped around scopes whose handlers require an authenticated session.
//! When no identity is attached the request short-circuits into a
//! redirect to the logon page and the protected handler never runs. The
//! requested path is remembered (GET requests only) so a successful logon
//! can return the user to where they were headed.
//!
//! Must sit inside the session middleware: it reads the session resolved
//! for this request.

use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{Method, header};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::domain::FlashMessage;
use crate::inbound::http::session::SessionContext;

/// Logon entry point unauthenticated requests are redirected to.
pub const LOGON_PATH: &str = "/sessions/logon";

const LOGON_REQUIRED_MESSAGE: &str = "Please log on to continue.";

/// Middleware factory gating a scope behind an authenticated session.
#[derive(Clone)]
pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware { service }))
    }
}

/// Service wrapper produced by [`RequireAuth`]; not used directly.
pub struct RequireAuthMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let session = SessionContext::new(req.get_session());

        // A session that cannot be read counts as anonymous, matching the
        // forged-cookie behaviour of the session layer itself.
        let authenticated = match session.user_id() {
            Ok(id) => id.is_some(),
            Err(error) => {
                warn!(%error, "session read failed in authorization gate");
                false
            }
        };

        if authenticated {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        if req.method() == Method::GET {
            if let Err(error) = session.set_return_to(req.path()) {
                warn!(%error, "failed to record return path");
            }
        }
        if let Err(error) = session.push_flash(FlashMessage::error(LOGON_REQUIRED_MESSAGE)) {
            warn!(%error, "failed to queue logon flash");
        }

        let (request, _payload) = req.into_parts();
        let response = HttpResponse::SeeOther()
            .insert_header((header::LOCATION, LOGON_PATH))
            .finish()
            .map_into_right_body();
        Box::pin(ready(Ok(ServiceResponse::new(request, response))))
    }
}
