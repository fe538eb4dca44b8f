use std::sync::Arc;

use crate::database::store::{ApplicationStore, JobStore};
use crate::dto::application_dto::UpdateStatusPayload;
use crate::error::{Error, Result};
use crate::models::application::{Application, CandidateApplication, JobApplication};
use crate::models::user::Role;
use crate::utils::token::Claims;

pub const ALREADY_APPLIED_MESSAGE: &str = "Already applied for this job";

#[derive(Clone)]
pub struct ApplicationService {
    jobs: Arc<dyn JobStore>,
    applications: Arc<dyn ApplicationStore>,
}

impl ApplicationService {
    pub fn new(jobs: Arc<dyn JobStore>, applications: Arc<dyn ApplicationStore>) -> Self {
        Self { jobs, applications }
    }

    /// The store's (job, candidate) uniqueness constraint decides duplicates;
    /// there is no separate existence check to race against.
    pub async fn apply(&self, actor: &Claims, job_id: i64) -> Result<Application> {
        actor.ensure_role(Role::Candidate)?;
        if self.jobs.find_job(job_id).await?.is_none() {
            return Err(Error::NotFound("Job not found".to_string()));
        }

        match self
            .applications
            .insert_application(job_id, actor.user_id)
            .await
        {
            Ok(application) => {
                tracing::info!(
                    application_id = application.id,
                    job_id,
                    candidate_id = actor.user_id,
                    "Application submitted"
                );
                Ok(application)
            }
            Err(Error::Conflict(_)) => {
                tracing::warn!(job_id, candidate_id = actor.user_id, "Duplicate application rejected");
                Err(Error::Duplicate(ALREADY_APPLIED_MESSAGE.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn list_by_candidate(&self, candidate_id: i64) -> Result<Vec<CandidateApplication>> {
        self.applications
            .find_applications_by_candidate(candidate_id)
            .await
    }

    pub async fn list_by_job(&self, actor: &Claims, job_id: i64) -> Result<Vec<JobApplication>> {
        self.ensure_job_owner(actor, job_id).await?;
        self.applications.find_applications_by_job(job_id).await
    }

    pub async fn update_status(
        &self,
        actor: &Claims,
        application_id: i64,
        payload: UpdateStatusPayload,
    ) -> Result<Application> {
        let (status, response) = payload.parse()?;

        let current = self
            .applications
            .find_application(application_id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        self.ensure_job_owner(actor, current.job_id).await?;

        if current.status.is_terminal() && current.status != status {
            tracing::debug!(
                application_id,
                from = %current.status,
                to = %status,
                "Changing an already decided application"
            );
        }

        let application = self
            .applications
            .set_application_status(application_id, status, response)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        tracing::info!(application_id, status = %application.status, "Application status updated");
        Ok(application)
    }

    async fn ensure_job_owner(&self, actor: &Claims, job_id: i64) -> Result<()> {
        let job = self
            .jobs
            .find_job(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        if job.job.hr_id != actor.user_id {
            tracing::warn!(job_id, caller = actor.user_id, "Rejected application access by non-owner");
            return Err(Error::Forbidden(
                "Only the HR user who posted this job can manage its applications".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::{MockApplicationStore, MockJobStore};
    use crate::models::application::ApplicationStatus;
    use crate::models::job::{Job, JobPoster, JobType, JobWithPoster};
    use chrono::Utc;

    fn claims(user_id: i64, role: Role) -> Claims {
        Claims {
            user_id,
            role,
            name: "Tester".into(),
            exp: usize::MAX,
        }
    }

    fn job_owned_by(hr_id: i64) -> MockJobStore {
        let mut jobs = MockJobStore::new();
        jobs.expect_find_job().returning(move |id| {
            Ok(Some(JobWithPoster {
                job: Job {
                    id,
                    title: "Backend Engineer".into(),
                    company: "Acme".into(),
                    location: "Remote".into(),
                    description: "...".into(),
                    requirements: "Go, SQL".into(),
                    salary: None,
                    job_type: JobType::FullTime,
                    hr_id,
                    created_at: Utc::now(),
                },
                hr: JobPoster {
                    name: "Hana".into(),
                    email: None,
                },
            }))
        });
        jobs
    }

    fn application(id: i64, status: ApplicationStatus) -> Application {
        let now = Utc::now();
        Application {
            id,
            job_id: 10,
            candidate_id: 7,
            status,
            response: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn unique_violation_becomes_duplicate_error() {
        let mut applications = MockApplicationStore::new();
        applications
            .expect_insert_application()
            .returning(|_, _| Err(Error::Conflict("applications_job_candidate_key".into())));
        let service = ApplicationService::new(Arc::new(job_owned_by(1)), Arc::new(applications));

        let err = service
            .apply(&claims(7, Role::Candidate), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Duplicate(ref m) if m == ALREADY_APPLIED_MESSAGE));
    }

    #[tokio::test]
    async fn hr_users_cannot_apply() {
        let mut applications = MockApplicationStore::new();
        applications.expect_insert_application().times(0);
        let service = ApplicationService::new(Arc::new(job_owned_by(1)), Arc::new(applications));

        let err = service.apply(&claims(1, Role::Hr), 10).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn invalid_status_leaves_application_untouched() {
        let mut applications = MockApplicationStore::new();
        applications.expect_find_application().times(0);
        applications.expect_set_application_status().times(0);
        let service = ApplicationService::new(Arc::new(job_owned_by(1)), Arc::new(applications));

        let payload = UpdateStatusPayload {
            status: Some("hired".into()),
            response: None,
        };
        let err = service
            .update_status(&claims(1, Role::Hr), 4, payload)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn only_job_owner_sets_status() {
        let mut applications = MockApplicationStore::new();
        applications
            .expect_find_application()
            .returning(|id| Ok(Some(application(id, ApplicationStatus::Pending))));
        applications.expect_set_application_status().times(0);
        let service = ApplicationService::new(Arc::new(job_owned_by(1)), Arc::new(applications));

        let payload = UpdateStatusPayload {
            status: Some("accepted".into()),
            response: None,
        };
        let err = service
            .update_status(&claims(2, Role::Hr), 4, payload)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn owner_sets_status_and_response() {
        let mut applications = MockApplicationStore::new();
        applications
            .expect_find_application()
            .returning(|id| Ok(Some(application(id, ApplicationStatus::Pending))));
        applications
            .expect_set_application_status()
            .withf(|id, status, response| {
                *id == 4
                    && *status == ApplicationStatus::Accepted
                    && response.as_deref() == Some("Welcome aboard")
            })
            .times(1)
            .returning(|id, status, response| {
                let mut updated = application(id, status);
                updated.response = response;
                Ok(Some(updated))
            });
        let service = ApplicationService::new(Arc::new(job_owned_by(1)), Arc::new(applications));

        let payload = UpdateStatusPayload {
            status: Some("accepted".into()),
            response: Some("Welcome aboard".into()),
        };
        let updated = service
            .update_status(&claims(1, Role::Hr), 4, payload)
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Accepted);
        assert_eq!(updated.response.as_deref(), Some("Welcome aboard"));
    }
}
