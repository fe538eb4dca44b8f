use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::job_dto::{
        CreateJobPayload, JobListQuery, JobMessageResponse, MessageResponse, UpdateJobPayload,
    },
    error::Result,
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/jobs/create/{hr_id}",
    params(
        ("hr_id" = i64, Path, description = "Posting HR user; must match the token")
    ),
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created successfully", body = JobMessageResponse),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not this HR user")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(hr_id): Path<i64>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    claims.ensure_user(hr_id)?;
    let job = state.job_service.create(&claims, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(JobMessageResponse {
            message: "Job created successfully".to_string(),
            job,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(JobListQuery),
    responses(
        (status = 200, description = "Jobs, newest first", body = [crate::models::job::JobWithPoster])
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list(query.into()).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found", body = crate::models::job::JobWithPoster),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get_by_id(id).await?;
    Ok(Json(job))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated successfully", body = JobMessageResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Caller does not own the job"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.update(&claims, id, payload).await?;
    Ok(Json(JobMessageResponse {
        message: "Job updated successfully".to_string(),
        job,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job deleted successfully", body = MessageResponse),
        (status = 403, description = "Caller does not own the job"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(&claims, id).await?;
    Ok(Json(MessageResponse {
        message: "Job deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/jobs/hr/{hr_id}",
    params(
        ("hr_id" = i64, Path, description = "HR user; must match the token")
    ),
    responses(
        (status = 200, description = "Jobs posted by the caller, newest first", body = [crate::models::job::JobWithPoster]),
        (status = 403, description = "Caller is not this HR user")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs_by_hr(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(hr_id): Path<i64>,
) -> Result<impl IntoResponse> {
    claims.ensure_user(hr_id)?;
    let jobs = state.job_service.list_by_owner(hr_id).await?;
    Ok(Json(jobs))
}
