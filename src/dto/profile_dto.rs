use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::profile::Profile;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileMessageResponse {
    pub message: String,
    pub profile: Profile,
}
