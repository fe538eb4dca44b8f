use std::sync::Arc;

use crate::database::store::ProfileStore;
use crate::error::{Error, Result};
use crate::models::profile::{Profile, ProfileFields, ProfileWithUser};

#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileStore>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self { profiles }
    }

    pub async fn get(&self, user_id: i64) -> Result<ProfileWithUser> {
        self.profiles
            .find_profile(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("Profile not found".to_string()))
    }

    /// Writes every field as given; an omitted field is stored as null.
    pub async fn upsert(&self, user_id: i64, fields: ProfileFields) -> Result<Profile> {
        let profile = self.profiles.upsert_profile(user_id, fields).await?;
        tracing::info!(user_id, profile_id = profile.id, "Profile saved");
        Ok(profile)
    }
}
