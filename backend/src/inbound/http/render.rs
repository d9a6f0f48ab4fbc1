//! Template rendering helpers.
//!
//! Handlers hand a template to these helpers instead of touching the
//! response builder, so every page carries the same content type and
//! render failures funnel through the domain error type.

use actix_web::{HttpResponse, http::StatusCode, http::header::ContentType};
use askama::Template;

use crate::domain::Error;

use super::error::ApiResult;

/// Render a template as a `200 OK` HTML page.
pub fn page<T: Template>(template: &T) -> ApiResult<HttpResponse> {
    page_with_status(template, StatusCode::OK)
}

/// Render a template with an explicit status, e.g. `400` for a form
/// re-rendered with validation errors.
pub fn page_with_status<T: Template>(
    template: &T,
    status: StatusCode,
) -> ApiResult<HttpResponse> {
    let body = template
        .render()
        .map_err(|err| Error::internal(format!("template rendering failed: {err}")))?;
    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body))
}
