use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::application_dto::{ApplicationMessageResponse, UpdateStatusPayload},
    error::Result,
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/jobs/apply/{job_id}/{candidate_id}",
    params(
        ("job_id" = i64, Path, description = "Job to apply to"),
        ("candidate_id" = i64, Path, description = "Applying candidate; must match the token")
    ),
    responses(
        (status = 201, description = "Application submitted successfully", body = ApplicationMessageResponse),
        (status = 400, description = "Already applied for this job"),
        (status = 403, description = "Caller is not this candidate"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn apply_for_job(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((job_id, candidate_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    claims.ensure_user(candidate_id)?;
    let application = state.application_service.apply(&claims, job_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationMessageResponse {
            message: "Application submitted successfully".to_string(),
            application,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/jobs/applications/{candidate_id}",
    params(
        ("candidate_id" = i64, Path, description = "Candidate; must match the token")
    ),
    responses(
        (status = 200, description = "The candidate's applications, newest first", body = [crate::models::application::CandidateApplication]),
        (status = 403, description = "Caller is not this candidate")
    )
)]
#[axum::debug_handler]
pub async fn list_candidate_applications(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(candidate_id): Path<i64>,
) -> Result<impl IntoResponse> {
    claims.ensure_user(candidate_id)?;
    let applications = state
        .application_service
        .list_by_candidate(candidate_id)
        .await?;
    Ok(Json(applications))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{job_id}/applications",
    params(
        ("job_id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Applications for the job, newest first", body = [crate::models::application::JobApplication]),
        (status = 403, description = "Caller does not own the job"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn list_job_applications(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(job_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let applications = state
        .application_service
        .list_by_job(&claims, job_id)
        .await?;
    Ok(Json(applications))
}

#[utoipa::path(
    put,
    path = "/api/jobs/applications/{application_id}/status",
    params(
        ("application_id" = i64, Path, description = "Application ID")
    ),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Application status updated successfully", body = ApplicationMessageResponse),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Caller does not own the job"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(application_id): Path<i64>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .update_status(&claims, application_id, payload)
        .await?;
    Ok(Json(ApplicationMessageResponse {
        message: "Application status updated successfully".to_string(),
        application,
    }))
}
