use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::job::{Job, JobChanges, JobFilter, JobType, NewJob};
use crate::utils::validation::{non_blank, validate_with_message};

pub const MISSING_FIELDS_MESSAGE: &str = "All required fields must be filled";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateJobPayload {
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub company: Option<String>,
    #[validate(required, length(min = 1))]
    pub location: Option<String>,
    #[validate(required, length(min = 1))]
    pub description: Option<String>,
    #[validate(required, length(min = 1))]
    pub requirements: Option<String>,
    pub salary: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
}

impl CreateJobPayload {
    /// Trims every field, validates, and resolves defaults.
    pub fn into_new_job(self) -> Result<NewJob> {
        let payload = Self {
            title: non_blank(self.title),
            company: non_blank(self.company),
            location: non_blank(self.location),
            description: non_blank(self.description),
            requirements: non_blank(self.requirements),
            salary: non_blank(self.salary),
            job_type: non_blank(self.job_type),
        };
        validate_with_message(&payload, MISSING_FIELDS_MESSAGE)?;

        let job_type = match payload.job_type {
            Some(raw) => parse_job_type(&raw)?,
            None => JobType::default(),
        };

        Ok(NewJob {
            title: payload.title.unwrap_or_default(),
            company: payload.company.unwrap_or_default(),
            location: payload.location.unwrap_or_default(),
            description: payload.description.unwrap_or_default(),
            requirements: payload.requirements.unwrap_or_default(),
            salary: payload.salary,
            job_type,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub company: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub requirements: Option<String>,
    /// An empty string clears the salary.
    pub salary: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
}

impl UpdateJobPayload {
    pub fn into_changes(self) -> Result<JobChanges> {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        let payload = Self {
            title: trim(self.title),
            company: trim(self.company),
            location: trim(self.location),
            description: trim(self.description),
            requirements: trim(self.requirements),
            salary: self.salary,
            job_type: self.job_type,
        };
        validate_with_message(&payload, "Job fields cannot be empty")?;

        let job_type = payload
            .job_type
            .as_deref()
            .map(parse_job_type)
            .transpose()?;

        Ok(JobChanges {
            title: payload.title,
            company: payload.company,
            location: payload.location,
            description: payload.description,
            requirements: payload.requirements,
            salary: payload.salary.map(|s| non_blank(Some(s))),
            job_type,
        })
    }
}

fn parse_job_type(raw: &str) -> Result<JobType> {
    raw.parse::<JobType>().map_err(|_| {
        Error::BadRequest(
            "Job type must be one of full-time, part-time, contract, internship".to_string(),
        )
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct JobListQuery {
    /// Substring of the job title.
    pub search: Option<String>,
    /// Substring of the job location.
    pub location: Option<String>,
    /// Substring of the job requirements.
    pub skills: Option<String>,
}

impl From<JobListQuery> for JobFilter {
    fn from(value: JobListQuery) -> Self {
        Self {
            search: non_blank(value.search),
            location: non_blank(value.location),
            skills: non_blank(value.skills),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobMessageResponse {
    pub message: String,
    pub job: Job,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
