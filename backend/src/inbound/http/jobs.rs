//! Ownership-scoped job CRUD handlers.
//!
//! ```text
//! GET  /jobs               list the owner's jobs, newest first
//! GET  /jobs/new           creation form
//! POST /jobs               create
//! GET  /jobs/edit/{id}     edit form for an owned job
//! POST /jobs/update/{id}   update an owned job
//! POST /jobs/delete/{id}   delete an owned job
//! ```
//!
//! Every lookup and mutation filters on `(id AND owner)`, so another
//! owner's job — like a malformed or unknown id — surfaces as a plain
//! 404. The scope is wrapped in the authorization gate; handlers still
//! call `require_user_id` so they fail closed if ever mounted bare.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, get, post, web};
use askama::Template;
use serde::Deserialize;

use crate::domain::ports::JobPersistenceError;
use crate::domain::{Error, FieldError, FlashMessage, Job, JobDraft, JobId, JobStatus};

use super::csrf::CsrfForm;
use super::error::ApiResult;
use super::render;
use super::session::SessionContext;
use super::sessions::TokenOnlyForm;
use super::state::HttpState;

const JOB_NOT_FOUND_MESSAGE: &str = "Job not found.";

fn map_job_persistence_error(error: JobPersistenceError) -> Error {
    match error {
        JobPersistenceError::Connection { message } => Error::service_unavailable(message),
        JobPersistenceError::Query { message } => Error::internal(message),
    }
}

/// Parse a job id from a route parameter; malformed ids are
/// indistinguishable from unknown ones.
fn parse_job_id(raw: &str) -> Result<JobId, Error> {
    JobId::parse(raw).map_err(|_| Error::not_found(JOB_NOT_FOUND_MESSAGE))
}

fn redirect_to_jobs() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/jobs"))
        .finish()
}

/// One `<option>` of the status selector.
struct StatusOption {
    value: &'static str,
    selected: bool,
}

fn status_options(selected: JobStatus) -> Vec<StatusOption> {
    JobStatus::ALL
        .iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            selected: *status == selected,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "jobs.html")]
struct JobsPage {
    flashes: Vec<FlashMessage>,
    csrf_token: String,
    jobs: Vec<Job>,
}

#[derive(Template)]
#[template(path = "job_form.html")]
struct JobFormPage {
    flashes: Vec<FlashMessage>,
    csrf_token: String,
    heading: &'static str,
    submit_label: &'static str,
    action: String,
    company: String,
    position: String,
    statuses: Vec<StatusOption>,
    errors: Vec<FieldError>,
}

/// Job form body shared by create and update.
#[derive(Debug, Deserialize)]
pub struct JobForm {
    /// Company the application was sent to.
    pub company: String,
    /// Position applied for.
    pub position: String,
    /// Application status value.
    pub status: String,
}

impl JobForm {
    fn parse_draft(&self) -> Result<JobDraft, Vec<FieldError>> {
        JobDraft::parse(&self.company, &self.position, &self.status)
    }

    /// Status for re-rendering the selector after a validation failure.
    fn selected_status(&self) -> JobStatus {
        JobStatus::parse(&self.status).unwrap_or_default()
    }
}

/// List the owner's jobs, newest first.
#[get("")]
pub async fn list_jobs(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let jobs = state
        .jobs
        .list_for_owner(&owner)
        .await
        .map_err(map_job_persistence_error)?;
    let page = JobsPage {
        flashes: session.take_flashes()?,
        csrf_token: session.issue_csrf_token()?,
        jobs,
    };
    render::page(&page)
}

/// Render the empty creation form.
#[get("/new")]
pub async fn new_job_form(session: SessionContext) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let page = JobFormPage {
        flashes: session.take_flashes()?,
        csrf_token: session.issue_csrf_token()?,
        heading: "Add a job application",
        submit_label: "Add",
        action: "/jobs".to_owned(),
        company: String::new(),
        position: String::new(),
        statuses: status_options(JobStatus::default()),
        errors: Vec::new(),
    };
    render::page(&page)
}

/// Create a job owned by the authenticated user.
#[post("")]
pub async fn create_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: CsrfForm<JobForm>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let form = form.into_inner();

    let draft = match form.parse_draft() {
        Ok(draft) => draft,
        Err(errors) => {
            // Submitted input is never silently dropped.
            let page = JobFormPage {
                flashes: session.take_flashes()?,
                csrf_token: session.issue_csrf_token()?,
                heading: "Add a job application",
                submit_label: "Add",
                action: "/jobs".to_owned(),
                company: form.company.clone(),
                position: form.position.clone(),
                statuses: status_options(form.selected_status()),
                errors,
            };
            return render::page_with_status(&page, StatusCode::BAD_REQUEST);
        }
    };

    state
        .jobs
        .create(&owner, &draft)
        .await
        .map_err(map_job_persistence_error)?;
    session.push_flash(FlashMessage::info("Job application added."))?;
    Ok(redirect_to_jobs())
}

/// Render the edit form for an owned job.
#[get("/edit/{id}")]
pub async fn edit_job_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let id = parse_job_id(&path)?;

    let job = state
        .jobs
        .find_for_owner(&id, &owner)
        .await
        .map_err(map_job_persistence_error)?
        .ok_or_else(|| Error::not_found(JOB_NOT_FOUND_MESSAGE))?;

    let page = JobFormPage {
        flashes: session.take_flashes()?,
        csrf_token: session.issue_csrf_token()?,
        heading: "Edit job application",
        submit_label: "Update",
        action: format!("/jobs/update/{id}"),
        company: job.company().to_owned(),
        position: job.position().to_owned(),
        statuses: status_options(job.status()),
        errors: Vec::new(),
    };
    render::page(&page)
}

/// Update an owned job with one conditional statement.
#[post("/update/{id}")]
pub async fn update_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: CsrfForm<JobForm>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let id = parse_job_id(&path)?;
    let form = form.into_inner();

    let draft = match form.parse_draft() {
        Ok(draft) => draft,
        Err(errors) => {
            // Confirm the job is still the caller's before re-rendering
            // with the attempted edits merged over it.
            state
                .jobs
                .find_for_owner(&id, &owner)
                .await
                .map_err(map_job_persistence_error)?
                .ok_or_else(|| Error::not_found(JOB_NOT_FOUND_MESSAGE))?;
            let page = JobFormPage {
                flashes: session.take_flashes()?,
                csrf_token: session.issue_csrf_token()?,
                heading: "Edit job application",
                submit_label: "Update",
                action: format!("/jobs/update/{id}"),
                company: form.company.clone(),
                position: form.position.clone(),
                statuses: status_options(form.selected_status()),
                errors,
            };
            return render::page_with_status(&page, StatusCode::BAD_REQUEST);
        }
    };

    let updated = state
        .jobs
        .update_for_owner(&id, &owner, &draft)
        .await
        .map_err(map_job_persistence_error)?;
    if updated.is_none() {
        return Err(Error::not_found(JOB_NOT_FOUND_MESSAGE));
    }

    session.push_flash(FlashMessage::info("Job updated."))?;
    Ok(redirect_to_jobs())
}

/// Delete an owned job with one conditional statement.
#[post("/delete/{id}")]
pub async fn delete_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    _form: CsrfForm<TokenOnlyForm>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let id = parse_job_id(&path)?;

    let deleted = state
        .jobs
        .delete_for_owner(&id, &owner)
        .await
        .map_err(map_job_persistence_error)?;
    if !deleted {
        return Err(Error::not_found(JOB_NOT_FOUND_MESSAGE));
    }

    session.push_flash(FlashMessage::info("Job deleted."))?;
    Ok(redirect_to_jobs())
}

#[cfg(test)]
mod tests {
    //! Handler-level coverage with in-memory adapters; the end-to-end
    //! flows live in the integration suite.
    use std::sync::Arc;

    use super::*;
    use crate::domain::UserId;
    use crate::domain::ports::JobRepository;
    use crate::outbound::memory::InMemoryJobRepository;
    use actix_web::{App, test};

    struct TestHarness {
        jobs: Arc<InMemoryJobRepository>,
        state: web::Data<HttpState>,
    }

    fn harness() -> TestHarness {
        let jobs = Arc::new(InMemoryJobRepository::default());
        let users = Arc::new(crate::outbound::memory::InMemoryUserRepository::default());
        let auth = crate::domain::PasswordAuthenticator::new(
            users,
            Arc::new(crate::outbound::BcryptPasswordHasher::with_cost(4)),
        );
        let state = web::Data::new(HttpState::new(Arc::new(auth), jobs.clone()));
        TestHarness { jobs, state }
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
            .route(
                "/fixture-logon/{id}",
                web::get().to(
                    |session: SessionContext, path: web::Path<String>| async move {
                        let id = UserId::parse(&path).expect("fixture user id");
                        session.persist_user_parts(&id, "Ada")?;
                        session.ensure_csrf_secret()?;
                        Ok::<_, Error>(HttpResponse::Ok().finish())
                    },
                ),
            )
            .service(
                web::scope("/jobs")
                    .service(list_jobs)
                    .service(new_job_form)
                    .service(create_job)
                    .service(edit_job_form)
                    .service(update_job)
                    .service(delete_job),
            )
    }

    async fn logon_as(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        owner: &UserId,
    ) -> actix_web::cookie::Cookie<'static> {
        let res = test::call_service(
            app,
            test::TestRequest::get()
                .uri(&format!("/fixture-logon/{owner}"))
                .to_request(),
        )
        .await;
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    async fn csrf_token_for(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        cookie: actix_web::cookie::Cookie<'static>,
    ) -> (String, actix_web::cookie::Cookie<'static>) {
        let res = test::call_service(
            app,
            test::TestRequest::get()
                .uri("/jobs/new")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        // The cookie store only re-sets the cookie when state changed.
        let cookie = res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .map_or(cookie, |c| c.into_owned());
        let html = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8 page");
        let marker = "name=\"_csrf\" value=\"";
        let start = html.find(marker).expect("token field present") + marker.len();
        let end = html[start..].find('"').expect("token terminated") + start;
        (html[start..end].to_owned(), cookie)
    }

    #[actix_web::test]
    async fn foreign_job_id_is_indistinguishable_from_missing() {
        let TestHarness { jobs, state } = harness();
        let owner_a = UserId::random();
        let owner_b = UserId::random();
        let draft = JobDraft::parse("Initech", "Engineer", "pending").expect("valid draft");
        let job = jobs.create(&owner_a, &draft).await.expect("seed job");

        let app = test::init_service(test_app(state)).await;
        let cookie = logon_as(&app, &owner_b).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/jobs/edit/{}", job.id()))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        // The owner's job is untouched.
        let still_there = jobs
            .find_for_owner(job.id(), &owner_a)
            .await
            .expect("lookup succeeds");
        assert!(still_there.is_some());
    }

    #[actix_web::test]
    async fn create_with_blank_fields_rerenders_preserving_input() {
        let TestHarness { jobs: _, state } = harness();
        let owner = UserId::random();
        let app = test::init_service(test_app(state)).await;
        let cookie = logon_as(&app, &owner).await;
        let (token, cookie) = csrf_token_for(&app, cookie).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/jobs")
                .cookie(cookie)
                .set_form([
                    ("_csrf", token.as_str()),
                    ("company", "Initech"),
                    ("position", "   "),
                    ("status", "pending"),
                ])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let html = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8 page");
        assert!(html.contains("Position is required."));
        assert!(html.contains("value=\"Initech\""));
    }

    #[actix_web::test]
    async fn second_delete_returns_not_found() {
        let TestHarness { jobs, state } = harness();
        let owner = UserId::random();
        let draft = JobDraft::parse("Initech", "Engineer", "pending").expect("valid draft");
        let job = jobs.create(&owner, &draft).await.expect("seed job");

        let app = test::init_service(test_app(state)).await;
        let cookie = logon_as(&app, &owner).await;
        let (token, cookie) = csrf_token_for(&app, cookie).await;

        let delete_request = |cookie: actix_web::cookie::Cookie<'static>| {
            test::TestRequest::post()
                .uri(&format!("/jobs/delete/{}", job.id()))
                .cookie(cookie)
                .set_form([("_csrf", token.as_str())])
                .to_request()
        };

        let first = test::call_service(&app, delete_request(cookie.clone())).await;
        assert_eq!(first.status(), StatusCode::SEE_OTHER);

        let second = test::call_service(&app, delete_request(cookie)).await;
        assert_eq!(second.status(), StatusCode::NOT_FOUND);
    }
}
