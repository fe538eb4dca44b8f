use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};

use crate::{
    dto::profile_dto::ProfileMessageResponse,
    error::Result,
    middleware::auth::AuthUser,
    models::profile::ProfileFields,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/profile/{user_id}",
    params(
        ("user_id" = i64, Path, description = "Profile owner; must match the token")
    ),
    responses(
        (status = 200, description = "Profile found", body = crate::models::profile::ProfileWithUser),
        (status = 403, description = "Caller is not this user"),
        (status = 404, description = "Profile not found")
    )
)]
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse> {
    claims.ensure_user(user_id)?;
    let profile = state.profile_service.get(user_id).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/api/profile/{user_id}",
    params(
        ("user_id" = i64, Path, description = "Profile owner; must match the token")
    ),
    request_body = ProfileFields,
    responses(
        (status = 200, description = "Profile updated successfully", body = ProfileMessageResponse),
        (status = 403, description = "Caller is not this user")
    )
)]
#[axum::debug_handler]
pub async fn upsert_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<i64>,
    Json(fields): Json<ProfileFields>,
) -> Result<impl IntoResponse> {
    claims.ensure_user(user_id)?;
    let profile = state.profile_service.upsert(user_id, fields).await?;
    Ok(Json(ProfileMessageResponse {
        message: "Profile updated successfully".to_string(),
        profile,
    }))
}
