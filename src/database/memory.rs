//! In-process store with the same constraints as the Postgres schema:
//! unique user email, one application per (job, candidate), one profile per
//! user, and cascading job deletes.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::database::store::{ApplicationStore, JobStore, ProfileStore, UserStore};
use crate::error::{Error, Result};
use crate::models::application::{
    Application, ApplicationStatus, CandidateApplication, CandidateContact, JobApplication,
    JobSummary,
};
use crate::models::job::{Job, JobChanges, JobFilter, JobPoster, JobWithPoster, NewJob};
use crate::models::profile::{Profile, ProfileFields, ProfileOwner, ProfileWithUser};
use crate::models::user::{NewUser, User};
use crate::utils::time::now;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    jobs: BTreeMap<i64, Job>,
    applications: BTreeMap<i64, Application>,
    profiles: BTreeMap<i64, Profile>,
    next_id: HashMap<&'static str, i64>,
}

impl Tables {
    fn next_id(&mut self, table: &'static str) -> i64 {
        let id = self.next_id.entry(table).or_insert(0);
        *id += 1;
        *id
    }

    fn poster(&self, hr_id: i64, with_email: bool) -> Result<JobPoster> {
        let user = self
            .users
            .get(&hr_id)
            .ok_or_else(|| Error::Internal(format!("Job poster {} missing", hr_id)))?;
        Ok(JobPoster {
            name: user.name.clone(),
            email: with_email.then(|| user.email.clone()),
        })
    }

    /// Applications to `job`, newest first.
    fn job_applications(&self, job: &Job) -> Result<Vec<JobApplication>> {
        let mut items = Vec::new();
        for application in self.applications.values().filter(|a| a.job_id == job.id) {
            let candidate = self.users.get(&application.candidate_id).ok_or_else(|| {
                Error::Internal(format!("Candidate {} missing", application.candidate_id))
            })?;
            items.push(JobApplication {
                application: application.clone(),
                candidate: CandidateContact {
                    name: candidate.name.clone(),
                    email: candidate.email.clone(),
                    phone_number: candidate.phone_number.clone(),
                },
                job: JobSummary {
                    title: job.title.clone(),
                    company: job.company.clone(),
                    location: job.location.clone(),
                    job_type: job.job_type,
                },
            });
        }
        newest_first(&mut items, |i| (i.application.created_at, i.application.id));
        Ok(items)
    }

    fn owned_jobs(&self, hr_id: i64) -> Vec<&Job> {
        let mut jobs: Vec<&Job> = self.jobs.values().filter(|j| j.hr_id == hr_id).collect();
        newest_first(&mut jobs, |j| (j.created_at, j.id));
        jobs
    }

    fn with_poster(&self, job: &Job) -> Result<JobWithPoster> {
        Ok(JobWithPoster {
            job: job.clone(),
            hr: self.poster(job.hr_id, true)?,
        })
    }
}

/// Newest first, ties broken by id so the order is total.
fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, i64)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| Error::Internal("memory store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.lock()?;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(Error::Conflict(
                "Unique constraint violated: users_email_key".to_string(),
            ));
        }
        let id = tables.next_id("users");
        let user = User {
            id,
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn insert_job(&self, hr_id: i64, job: NewJob) -> Result<Job> {
        let mut tables = self.lock()?;
        if !tables.users.contains_key(&hr_id) {
            return Err(Error::NotFound("Referenced record not found".to_string()));
        }
        let id = tables.next_id("jobs");
        let job = Job {
            id,
            title: job.title,
            company: job.company,
            location: job.location,
            description: job.description,
            requirements: job.requirements,
            salary: job.salary,
            job_type: job.job_type,
            hr_id,
            created_at: now(),
        };
        tables.jobs.insert(id, job.clone());
        Ok(job)
    }

    async fn find_job(&self, id: i64) -> Result<Option<JobWithPoster>> {
        let tables = self.lock()?;
        tables
            .jobs
            .get(&id)
            .map(|job| tables.with_poster(job))
            .transpose()
    }

    async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<JobWithPoster>> {
        let tables = self.lock()?;
        let mut jobs = tables
            .jobs
            .values()
            .filter(|job| filter.matches(job))
            .map(|job| tables.with_poster(job))
            .collect::<Result<Vec<_>>>()?;
        newest_first(&mut jobs, |j| (j.job.created_at, j.job.id));
        Ok(jobs)
    }

    async fn find_jobs_by_owner(&self, hr_id: i64) -> Result<Vec<JobWithPoster>> {
        let tables = self.lock()?;
        tables
            .owned_jobs(hr_id)
            .into_iter()
            .map(|job| tables.with_poster(job))
            .collect()
    }

    async fn find_recent_jobs(&self, limit: i64) -> Result<Vec<JobWithPoster>> {
        let tables = self.lock()?;
        let mut jobs: Vec<&Job> = tables.jobs.values().collect();
        newest_first(&mut jobs, |j| (j.created_at, j.id));
        jobs.into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|job| tables.with_poster(job))
            .collect()
    }

    async fn count_jobs(&self) -> Result<i64> {
        Ok(self.lock()?.jobs.len() as i64)
    }

    async fn update_job(&self, id: i64, changes: JobChanges) -> Result<Option<Job>> {
        let mut tables = self.lock()?;
        Ok(tables.jobs.get_mut(&id).map(|job| {
            changes.apply_to(job);
            job.clone()
        }))
    }

    async fn delete_job(&self, id: i64) -> Result<bool> {
        let mut tables = self.lock()?;
        let existed = tables.jobs.remove(&id).is_some();
        if existed {
            tables.applications.retain(|_, a| a.job_id != id);
        }
        Ok(existed)
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn insert_application(&self, job_id: i64, candidate_id: i64) -> Result<Application> {
        let mut tables = self.lock()?;
        if !tables.jobs.contains_key(&job_id) || !tables.users.contains_key(&candidate_id) {
            return Err(Error::NotFound("Referenced record not found".to_string()));
        }
        if tables
            .applications
            .values()
            .any(|a| a.job_id == job_id && a.candidate_id == candidate_id)
        {
            return Err(Error::Conflict(
                "Unique constraint violated: applications_job_candidate_key".to_string(),
            ));
        }
        let id = tables.next_id("applications");
        let created_at = now();
        let application = Application {
            id,
            job_id,
            candidate_id,
            status: ApplicationStatus::Pending,
            response: None,
            created_at,
            updated_at: created_at,
        };
        tables.applications.insert(id, application.clone());
        Ok(application)
    }

    async fn find_application(&self, id: i64) -> Result<Option<Application>> {
        Ok(self.lock()?.applications.get(&id).cloned())
    }

    async fn find_applications_by_candidate(
        &self,
        candidate_id: i64,
    ) -> Result<Vec<CandidateApplication>> {
        let tables = self.lock()?;
        let mut items = Vec::new();
        for application in tables
            .applications
            .values()
            .filter(|a| a.candidate_id == candidate_id)
        {
            let job = tables
                .jobs
                .get(&application.job_id)
                .ok_or_else(|| Error::Internal(format!("Job {} missing", application.job_id)))?;
            items.push(CandidateApplication {
                application: application.clone(),
                job: JobWithPoster {
                    job: job.clone(),
                    hr: tables.poster(job.hr_id, false)?,
                },
            });
        }
        newest_first(&mut items, |i| (i.application.created_at, i.application.id));
        Ok(items)
    }

    async fn find_applications_by_job(&self, job_id: i64) -> Result<Vec<JobApplication>> {
        let tables = self.lock()?;
        match tables.jobs.get(&job_id) {
            Some(job) => tables.job_applications(job),
            None => Ok(Vec::new()),
        }
    }

    async fn set_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
        response: Option<String>,
    ) -> Result<Option<Application>> {
        let mut tables = self.lock()?;
        Ok(tables.applications.get_mut(&id).map(|application| {
            application.status = status;
            application.response = response;
            application.updated_at = now();
            application.clone()
        }))
    }

    async fn count_applications_by_owner(
        &self,
        hr_id: i64,
    ) -> Result<Vec<(i64, ApplicationStatus, i64)>> {
        let tables = self.lock()?;
        let mut counts: BTreeMap<(i64, &'static str), (ApplicationStatus, i64)> = BTreeMap::new();
        for application in tables.applications.values() {
            let owned = tables
                .jobs
                .get(&application.job_id)
                .is_some_and(|job| job.hr_id == hr_id);
            if owned {
                counts
                    .entry((application.job_id, application.status.as_str()))
                    .or_insert((application.status, 0))
                    .1 += 1;
            }
        }
        Ok(counts
            .into_iter()
            .map(|((job_id, _), (status, count))| (job_id, status, count))
            .collect())
    }

    async fn find_recent_applications_by_owner(
        &self,
        hr_id: i64,
        per_job: i64,
        limit: i64,
    ) -> Result<Vec<JobApplication>> {
        let tables = self.lock()?;
        let per_job = usize::try_from(per_job).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        let mut items = Vec::new();
        for job in tables.owned_jobs(hr_id) {
            items.extend(tables.job_applications(job)?.into_iter().take(per_job));
            if items.len() >= limit {
                break;
            }
        }
        items.truncate(limit);
        Ok(items)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_profile(&self, user_id: i64) -> Result<Option<ProfileWithUser>> {
        let tables = self.lock()?;
        let Some(profile) = tables.profiles.get(&user_id) else {
            return Ok(None);
        };
        let user = tables
            .users
            .get(&user_id)
            .ok_or_else(|| Error::Internal(format!("Profile owner {} missing", user_id)))?;
        Ok(Some(ProfileWithUser {
            profile: profile.clone(),
            user: ProfileOwner {
                name: user.name.clone(),
                email: user.email.clone(),
                phone_number: user.phone_number.clone(),
            },
        }))
    }

    async fn upsert_profile(&self, user_id: i64, fields: ProfileFields) -> Result<Profile> {
        let mut tables = self.lock()?;
        if !tables.users.contains_key(&user_id) {
            return Err(Error::NotFound("Referenced record not found".to_string()));
        }
        let timestamp = now();
        if let Some(profile) = tables.profiles.get_mut(&user_id) {
            profile.fields = fields;
            profile.updated_at = timestamp;
            return Ok(profile.clone());
        }
        let id = tables.next_id("profiles");
        let profile = Profile {
            id,
            user_id,
            fields,
            created_at: timestamp,
            updated_at: timestamp,
        };
        tables.profiles.insert(user_id, profile.clone());
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobType;
    use crate::models::user::Role;

    async fn seed_user(store: &MemoryStore, email: &str, role: Role) -> User {
        store
            .insert_user(NewUser {
                name: email.split('@').next().unwrap_or_default().to_string(),
                email: email.to_string(),
                phone_number: None,
                password_hash: "hash".to_string(),
                role,
            })
            .await
            .unwrap()
    }

    fn new_job(title: &str) -> NewJob {
        NewJob {
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: "...".to_string(),
            requirements: "Go, SQL".to_string(),
            salary: None,
            job_type: JobType::FullTime,
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let store = MemoryStore::new();
        seed_user(&store, "hr@example.com", Role::Hr).await;
        let err = store
            .insert_user(NewUser {
                name: "Other".into(),
                email: "hr@example.com".into(),
                phone_number: None,
                password_hash: "hash".into(),
                role: Role::Candidate,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn enforces_one_application_per_pair() {
        let store = MemoryStore::new();
        let hr = seed_user(&store, "hr@example.com", Role::Hr).await;
        let candidate = seed_user(&store, "cand@example.com", Role::Candidate).await;
        let job = store.insert_job(hr.id, new_job("Backend")).await.unwrap();

        let first = store.insert_application(job.id, candidate.id).await.unwrap();
        let err = store
            .insert_application(job.id, candidate.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(
            store.find_application(first.id).await.unwrap(),
            Some(first)
        );
    }

    #[tokio::test]
    async fn lists_newest_first_with_stable_ties() {
        let store = MemoryStore::new();
        let hr = seed_user(&store, "hr@example.com", Role::Hr).await;
        for title in ["One", "Two", "Three"] {
            store.insert_job(hr.id, new_job(title)).await.unwrap();
        }
        let titles: Vec<String> = store
            .find_jobs(&JobFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.job.title)
            .collect();
        assert_eq!(titles, vec!["Three", "Two", "One"]);
    }

    #[tokio::test]
    async fn deleting_a_job_cascades_to_applications() {
        let store = MemoryStore::new();
        let hr = seed_user(&store, "hr@example.com", Role::Hr).await;
        let candidate = seed_user(&store, "cand@example.com", Role::Candidate).await;
        let job = store.insert_job(hr.id, new_job("Backend")).await.unwrap();
        let application = store.insert_application(job.id, candidate.id).await.unwrap();

        assert!(store.delete_job(job.id).await.unwrap());
        assert!(!store.delete_job(job.id).await.unwrap());
        assert_eq!(store.find_application(application.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn upsert_keeps_a_single_profile() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "cand@example.com", Role::Candidate).await;
        let fields = ProfileFields {
            location: Some("Lisbon".into()),
            ..Default::default()
        };
        let first = store.upsert_profile(user.id, fields.clone()).await.unwrap();
        let second = store.upsert_profile(user.id, fields).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.fields, second.fields);
        assert_eq!(store.lock().unwrap().profiles.len(), 1);
    }

    #[tokio::test]
    async fn recent_jobs_are_limited_newest_first() {
        let store = MemoryStore::new();
        let hr = seed_user(&store, "hr@example.com", Role::Hr).await;
        for title in ["One", "Two", "Three"] {
            store.insert_job(hr.id, new_job(title)).await.unwrap();
        }
        let titles: Vec<String> = store
            .find_recent_jobs(2)
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.job.title)
            .collect();
        assert_eq!(titles, vec!["Three", "Two"]);
    }

    #[tokio::test]
    async fn recent_applications_take_a_few_per_job() {
        let store = MemoryStore::new();
        let hr = seed_user(&store, "hr@example.com", Role::Hr).await;
        let older = store.insert_job(hr.id, new_job("Older")).await.unwrap();
        let newer = store.insert_job(hr.id, new_job("Newer")).await.unwrap();
        for n in 0..3 {
            let candidate =
                seed_user(&store, &format!("cand{}@example.com", n), Role::Candidate).await;
            store.insert_application(older.id, candidate.id).await.unwrap();
            store.insert_application(newer.id, candidate.id).await.unwrap();
        }

        let recent = store
            .find_recent_applications_by_owner(hr.id, 2, 3)
            .await
            .unwrap();
        let jobs: Vec<&str> = recent.iter().map(|a| a.job.title.as_str()).collect();
        assert_eq!(jobs, vec!["Newer", "Newer", "Older"]);
        assert_eq!(recent[0].candidate.email, "cand2@example.com");

        let counts = store.count_applications_by_owner(hr.id).await.unwrap();
        assert_eq!(
            counts,
            vec![
                (older.id, ApplicationStatus::Pending, 3),
                (newer.id, ApplicationStatus::Pending, 3),
            ]
        );
    }
}
