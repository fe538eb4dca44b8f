use serde::{Deserialize, Serialize};

use crate::models::application::{JobApplication, StatusCounts};
use crate::models::job::JobWithPoster;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDashboard {
    pub total_jobs: i64,
    pub applications: i64,
    pub status_counts: StatusCounts,
    pub recent_jobs: Vec<JobWithPoster>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrJobOverview {
    #[serde(flatten)]
    pub job: JobWithPoster,
    pub application_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrDashboard {
    pub my_jobs: i64,
    pub total_applications: i64,
    pub active_jobs: i64,
    pub status_counts: StatusCounts,
    pub jobs: Vec<HrJobOverview>,
    /// Latest applications across the caller's jobs, for quick decisions.
    pub recent_applications: Vec<JobApplication>,
}

/// Role-scoped landing data, tagged by `role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum DashboardSummary {
    Candidate(CandidateDashboard),
    Hr(HrDashboard),
}
