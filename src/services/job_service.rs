use std::sync::Arc;

use crate::database::store::JobStore;
use crate::dto::job_dto::{CreateJobPayload, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::{Job, JobFilter, JobWithPoster};
use crate::models::user::Role;
use crate::utils::token::Claims;

#[derive(Clone)]
pub struct JobService {
    jobs: Arc<dyn JobStore>,
}

impl JobService {
    pub fn new(jobs: Arc<dyn JobStore>) -> Self {
        Self { jobs }
    }

    pub async fn create(&self, actor: &Claims, payload: CreateJobPayload) -> Result<Job> {
        actor.ensure_role(Role::Hr)?;
        let new_job = payload.into_new_job()?;

        let job = self.jobs.insert_job(actor.user_id, new_job).await?;
        tracing::info!(job_id = job.id, hr_id = job.hr_id, title = %job.title, "Job created");
        Ok(job)
    }

    pub async fn list(&self, filter: JobFilter) -> Result<Vec<JobWithPoster>> {
        self.jobs.find_jobs(&filter).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<JobWithPoster> {
        self.jobs
            .find_job(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }

    pub async fn list_by_owner(&self, hr_id: i64) -> Result<Vec<JobWithPoster>> {
        self.jobs.find_jobs_by_owner(hr_id).await
    }

    pub async fn update(
        &self,
        actor: &Claims,
        id: i64,
        payload: UpdateJobPayload,
    ) -> Result<Job> {
        let changes = payload.into_changes()?;
        self.owned_job(actor, id).await?;

        let job = self
            .jobs
            .update_job(id, changes)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        tracing::info!(job_id = id, "Job updated");
        Ok(job)
    }

    pub async fn delete(&self, actor: &Claims, id: i64) -> Result<()> {
        self.owned_job(actor, id).await?;

        if !self.jobs.delete_job(id).await? {
            return Err(Error::NotFound("Job not found".to_string()));
        }
        tracing::info!(job_id = id, "Job deleted");
        Ok(())
    }

    /// Loads a job and checks that `actor` posted it.
    pub async fn owned_job(&self, actor: &Claims, id: i64) -> Result<JobWithPoster> {
        let job = self.get_by_id(id).await?;
        if job.job.hr_id != actor.user_id {
            tracing::warn!(job_id = id, caller = actor.user_id, "Rejected job access by non-owner");
            return Err(Error::Forbidden(
                "Only the HR user who posted this job can manage it".to_string(),
            ));
        }
        Ok(job)
    }
}
