//! Query interface over the relational store.
//!
//! Services depend on these traits rather than on a concrete pool so the
//! same logic runs against Postgres ([`PgStore`](super::postgres::PgStore))
//! and the in-process [`MemoryStore`](super::memory::MemoryStore).
//!
//! Adapters report a violated uniqueness constraint as
//! [`Error::Conflict`](crate::error::Error::Conflict) and a dangling
//! reference as [`Error::NotFound`](crate::error::Error::NotFound); callers
//! decide what those mean in their domain.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::application::{
    Application, ApplicationStatus, CandidateApplication, JobApplication,
};
use crate::models::job::{Job, JobChanges, JobFilter, JobWithPoster, NewJob};
use crate::models::profile::{Profile, ProfileFields, ProfileWithUser};
use crate::models::user::{NewUser, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<User>;
    async fn find_user(&self, id: i64) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert_job(&self, hr_id: i64, job: NewJob) -> Result<Job>;
    async fn find_job(&self, id: i64) -> Result<Option<JobWithPoster>>;
    /// Newest first.
    async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<JobWithPoster>>;
    /// Newest first.
    async fn find_jobs_by_owner(&self, hr_id: i64) -> Result<Vec<JobWithPoster>>;
    async fn count_jobs(&self) -> Result<i64>;
    /// The `limit` newest jobs.
    async fn find_recent_jobs(&self, limit: i64) -> Result<Vec<JobWithPoster>>;
    async fn update_job(&self, id: i64, changes: JobChanges) -> Result<Option<Job>>;
    /// Removes the job and its applications. Returns whether a row existed.
    async fn delete_job(&self, id: i64) -> Result<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Creates a pending application; a second insert for the same
    /// (job, candidate) pair fails with `Error::Conflict`.
    async fn insert_application(&self, job_id: i64, candidate_id: i64) -> Result<Application>;
    async fn find_application(&self, id: i64) -> Result<Option<Application>>;
    async fn find_applications_by_candidate(
        &self,
        candidate_id: i64,
    ) -> Result<Vec<CandidateApplication>>;
    async fn find_applications_by_job(&self, job_id: i64) -> Result<Vec<JobApplication>>;
    async fn set_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
        response: Option<String>,
    ) -> Result<Option<Application>>;
    /// `(job_id, status, count)` for every job owned by `hr_id` that has
    /// applications in that status.
    async fn count_applications_by_owner(
        &self,
        hr_id: i64,
    ) -> Result<Vec<(i64, ApplicationStatus, i64)>>;
    /// Applications to jobs owned by `hr_id`: the `per_job` newest of each
    /// job, jobs taken newest first, at most `limit` in total.
    async fn find_recent_applications_by_owner(
        &self,
        hr_id: i64,
        per_job: i64,
        limit: i64,
    ) -> Result<Vec<JobApplication>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_profile(&self, user_id: i64) -> Result<Option<ProfileWithUser>>;
    async fn upsert_profile(&self, user_id: i64, fields: ProfileFields) -> Result<Profile>;
}

/// Everything the application needs from one backing store.
pub trait Store: UserStore + JobStore + ApplicationStore + ProfileStore {}

impl<T> Store for T where T: UserStore + JobStore + ApplicationStore + ProfileStore {}
