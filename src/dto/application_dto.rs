use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus};
use crate::utils::validation::non_blank;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateStatusPayload {
    /// One of `pending`, `accepted`, `rejected`.
    pub status: Option<String>,
    /// Optional message to the candidate; empty means none.
    pub response: Option<String>,
}

impl UpdateStatusPayload {
    pub fn parse(self) -> Result<(ApplicationStatus, Option<String>)> {
        let status = self
            .status
            .as_deref()
            .and_then(|s| s.parse::<ApplicationStatus>().ok())
            .ok_or_else(|| Error::BadRequest("Invalid status".to_string()))?;
        Ok((status, non_blank(self.response)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationMessageResponse {
    pub message: String,
    pub application: Application,
}
