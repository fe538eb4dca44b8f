use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Descriptive profile text. Every field is written on each save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileFields {
    pub location: Option<String>,
    pub roles_looking_for: Option<String>,
    pub technical_skills: Option<String>,
    pub soft_skills: Option<String>,
    pub tools_tech: Option<String>,
    pub degree: Option<String>,
    pub university: Option<String>,
    pub graduation_year: Option<String>,
    pub work_experience: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    #[serde(flatten)]
    pub fields: ProfileFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOwner {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProfileWithUser {
    #[serde(flatten)]
    pub profile: Profile,
    pub user: ProfileOwner,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_as_none() {
        let fields: ProfileFields =
            serde_json::from_str(r#"{"location":"Berlin","graduationYear":"2021"}"#).unwrap();
        assert_eq!(fields.location.as_deref(), Some("Berlin"));
        assert_eq!(fields.graduation_year.as_deref(), Some("2021"));
        assert_eq!(fields.degree, None);
    }

    #[test]
    fn profile_flattens_fields() {
        let now = Utc::now();
        let profile = Profile {
            id: 1,
            user_id: 9,
            fields: ProfileFields {
                technical_skills: Some("Rust".into()),
                ..Default::default()
            },
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["userId"], 9);
        assert_eq!(json["technicalSkills"], "Rust");
        assert!(json.get("fields").is_none());
    }
}
