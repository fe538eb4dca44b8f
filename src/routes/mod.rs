pub mod application;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod job;
pub mod profile;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::{middleware::cors::dashboard_cors, AppState};

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup,
        auth::login,
        auth::get_user,
        job::create_job,
        job::list_jobs,
        job::get_job,
        job::update_job,
        job::delete_job,
        job::list_jobs_by_hr,
        application::apply_for_job,
        application::list_candidate_applications,
        application::list_job_applications,
        application::update_application_status,
        profile::get_profile,
        profile::upsert_profile,
        dashboard::get_dashboard,
    ),
    components(schemas(
        crate::dto::auth_dto::SignupPayload,
        crate::dto::auth_dto::LoginPayload,
        crate::dto::auth_dto::AuthResponse,
        crate::dto::job_dto::CreateJobPayload,
        crate::dto::job_dto::UpdateJobPayload,
        crate::dto::job_dto::JobMessageResponse,
        crate::dto::job_dto::MessageResponse,
        crate::dto::application_dto::UpdateStatusPayload,
        crate::dto::application_dto::ApplicationMessageResponse,
        crate::dto::profile_dto::ProfileMessageResponse,
        crate::models::user::Role,
        crate::models::user::UserSummary,
        crate::models::job::Job,
        crate::models::job::JobType,
        crate::models::job::JobPoster,
        crate::models::job::JobWithPoster,
        crate::models::application::Application,
        crate::models::application::ApplicationStatus,
        crate::models::application::CandidateApplication,
        crate::models::application::CandidateContact,
        crate::models::application::JobSummary,
        crate::models::application::JobApplication,
        crate::models::application::StatusCounts,
        crate::models::profile::Profile,
        crate::models::profile::ProfileFields,
        crate::models::profile::ProfileOwner,
        crate::models::profile::ProfileWithUser,
    ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Public and authenticated routes share path prefixes, so authentication is
/// enforced per handler through the `AuthUser` extractor rather than a layer.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/user/:id", get(auth::get_user));

    let job_routes = Router::new()
        .route("/api/jobs", get(job::list_jobs))
        .route("/api/jobs/", get(job::list_jobs))
        .route("/api/jobs/create/:id", post(job::create_job))
        .route("/api/jobs/hr/:id", get(job::list_jobs_by_hr))
        .route(
            "/api/jobs/:id",
            get(job::get_job)
                .put(job::update_job)
                .delete(job::delete_job),
        )
        .route(
            "/api/jobs/apply/:job_id/:candidate_id",
            post(application::apply_for_job),
        )
        .route(
            "/api/jobs/applications/:id",
            get(application::list_candidate_applications),
        )
        .route(
            "/api/jobs/applications/:id/status",
            put(application::update_application_status),
        )
        .route(
            "/api/jobs/:id/applications",
            get(application::list_job_applications),
        );

    let profile_routes = Router::new().route(
        "/api/profile/:id",
        get(profile::get_profile).put(profile::upsert_profile),
    );

    Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .merge(auth_routes)
        .merge(job_routes)
        .merge(profile_routes)
        .with_state(state)
        .layer(dashboard_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/signup",
            "/api/jobs",
            "/api/jobs/{id}",
            "/api/jobs/apply/{job_id}/{candidate_id}",
            "/api/jobs/applications/{application_id}/status",
            "/api/profile/{user_id}",
            "/api/dashboard",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
