use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{error::Result, middleware::auth::AuthUser, AppState};

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Role-scoped summary tagged by `role`"),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse> {
    let summary = state.dashboard_service.summary(&claims).await?;
    Ok(Json(summary))
}
