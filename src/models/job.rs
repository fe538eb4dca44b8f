use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full-time" => Ok(JobType::FullTime),
            "part-time" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "internship" => Ok(JobType::Internship),
            other => Err(format!("Unknown job type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary: Option<String>,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub hr_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Name and contact of the HR user who posted a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobPoster {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobWithPoster {
    #[serde(flatten)]
    pub job: Job,
    pub hr: JobPoster,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary: Option<String>,
    pub job_type: JobType,
}

/// Partial update. `salary: Some(None)` clears the salary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobChanges {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub salary: Option<Option<String>>,
    pub job_type: Option<JobType>,
}

impl JobChanges {
    pub fn apply_to(&self, job: &mut Job) {
        if let Some(title) = &self.title {
            job.title = title.clone();
        }
        if let Some(company) = &self.company {
            job.company = company.clone();
        }
        if let Some(location) = &self.location {
            job.location = location.clone();
        }
        if let Some(description) = &self.description {
            job.description = description.clone();
        }
        if let Some(requirements) = &self.requirements {
            job.requirements = requirements.clone();
        }
        if let Some(salary) = &self.salary {
            job.salary = salary.clone();
        }
        if let Some(job_type) = self.job_type {
            job.job_type = job_type;
        }
    }
}

/// Case-insensitive substring filters, ANDed. `None` imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub search: Option<String>,
    pub location: Option<String>,
    pub skills: Option<String>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            match needle {
                Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
                None => true,
            }
        }
        contains(&job.title, &self.search)
            && contains(&job.location, &self.location)
            && contains(&job.requirements, &self.skills)
    }
}
