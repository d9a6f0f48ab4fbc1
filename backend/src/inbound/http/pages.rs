//! Landing page and fallback handlers.

use actix_web::{HttpResponse, get, http::header::ContentType};
use askama::Template;

use crate::domain::FlashMessage;

use super::error::ApiResult;
use super::render;
use super::session::SessionContext;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage {
    flashes: Vec<FlashMessage>,
    user_name: Option<String>,
    csrf_token: String,
}

/// Render the landing page.
#[get("/")]
pub async fn home(session: SessionContext) -> ApiResult<HttpResponse> {
    let page = IndexPage {
        flashes: session.take_flashes()?,
        user_name: session.user_name()?,
        csrf_token: session.issue_csrf_token()?,
    };
    render::page(&page)
}

/// Fallback for unmatched routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type(ContentType::plaintext())
        .body("Page not found")
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(home)
            .default_service(web::route().to(not_found))
    }

    #[actix_web::test]
    async fn home_renders_anonymous_landing() {
        let app = test::init_service(test_app()).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        let html = std::str::from_utf8(&body).expect("utf8 page");
        assert!(html.contains("/sessions/logon"));
        assert!(html.contains("/sessions/register"));
    }

    #[actix_web::test]
    async fn unmatched_routes_fall_through_to_404() {
        let app = test::init_service(test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/nowhere").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
