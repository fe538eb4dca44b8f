use std::collections::HashMap;
use std::sync::Arc;

use crate::database::store::{ApplicationStore, JobStore};
use crate::dto::dashboard_dto::{CandidateDashboard, DashboardSummary, HrDashboard, HrJobOverview};
use crate::error::Result;
use crate::models::application::StatusCounts;
use crate::models::user::Role;
use crate::utils::time::within_days;
use crate::utils::token::Claims;

const RECENT_JOBS: i64 = 6;
const ACTIVE_JOB_DAYS: i64 = 30;
const RECENT_APPLICATIONS_PER_JOB: i64 = 2;
const RECENT_APPLICATIONS: i64 = 5;

#[derive(Clone)]
pub struct DashboardService {
    jobs: Arc<dyn JobStore>,
    applications: Arc<dyn ApplicationStore>,
}

impl DashboardService {
    pub fn new(jobs: Arc<dyn JobStore>, applications: Arc<dyn ApplicationStore>) -> Self {
        Self { jobs, applications }
    }

    pub async fn summary(&self, actor: &Claims) -> Result<DashboardSummary> {
        match actor.role {
            Role::Candidate => self.candidate(actor.user_id).await.map(DashboardSummary::Candidate),
            Role::Hr => self.hr(actor.user_id).await.map(DashboardSummary::Hr),
        }
    }

    async fn candidate(&self, candidate_id: i64) -> Result<CandidateDashboard> {
        let total_jobs = self.jobs.count_jobs().await?;
        let recent_jobs = self.jobs.find_recent_jobs(RECENT_JOBS).await?;
        let status_counts: StatusCounts = self
            .applications
            .find_applications_by_candidate(candidate_id)
            .await?
            .into_iter()
            .map(|item| item.application.status)
            .collect();

        Ok(CandidateDashboard {
            total_jobs,
            applications: status_counts.total(),
            status_counts,
            recent_jobs,
        })
    }

    async fn hr(&self, hr_id: i64) -> Result<HrDashboard> {
        let jobs = self.jobs.find_jobs_by_owner(hr_id).await?;
        let mut per_job: HashMap<i64, i64> = HashMap::new();
        let mut status_counts = StatusCounts::default();
        for (job_id, status, count) in self.applications.count_applications_by_owner(hr_id).await? {
            *per_job.entry(job_id).or_insert(0) += count;
            status_counts.add(status, count);
        }
        let recent_applications = self
            .applications
            .find_recent_applications_by_owner(
                hr_id,
                RECENT_APPLICATIONS_PER_JOB,
                RECENT_APPLICATIONS,
            )
            .await?;

        let active_jobs = jobs
            .iter()
            .filter(|j| within_days(j.job.created_at, ACTIVE_JOB_DAYS))
            .count() as i64;
        let jobs: Vec<HrJobOverview> = jobs
            .into_iter()
            .map(|job| HrJobOverview {
                application_count: per_job.get(&job.job.id).copied().unwrap_or(0),
                job,
            })
            .collect();

        Ok(HrDashboard {
            my_jobs: jobs.len() as i64,
            total_applications: status_counts.total(),
            active_jobs,
            status_counts,
            jobs,
            recent_applications,
        })
    }
}
