use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::database::store::{ApplicationStore, JobStore, ProfileStore, UserStore};
use crate::error::{Error, Result};
use crate::models::application::{
    Application, ApplicationStatus, CandidateApplication, CandidateContact, JobApplication,
    JobSummary,
};
use crate::models::job::{Job, JobChanges, JobFilter, JobPoster, JobType, JobWithPoster, NewJob};
use crate::models::profile::{Profile, ProfileFields, ProfileOwner, ProfileWithUser};
use crate::models::user::{NewUser, Role, User};

const JOB_COLUMNS: &str =
    "j.id, j.title, j.company, j.location, j.description, j.requirements, j.salary, j.job_type, j.hr_id, j.created_at";

const APPLICATION_COLUMNS: &str =
    "a.id, a.job_id, a.candidate_id, a.status, a.response, a.created_at, a.updated_at";

const PROFILE_COLUMNS: &str = "p.id, p.user_id, p.location, p.roles_looking_for, p.technical_skills, p.soft_skills, p.tools_tech, p.degree, p.university, p.graduation_year, p.work_experience, p.created_at, p.updated_at";

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Escapes LIKE wildcards so filter text matches literally.
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn parse_column<T>(value: &str) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e: String| Error::Internal(format!("Corrupt stored value: {}", e)))
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    phone_number: Option<String>,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone_number: row.phone_number,
            password_hash: row.password_hash,
            role: parse_column::<Role>(&row.role)?,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct JobRow {
    id: i64,
    title: String,
    company: String,
    location: String,
    description: String,
    requirements: String,
    salary: Option<String>,
    job_type: String,
    hr_id: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = Error;

    fn try_from(row: JobRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            title: row.title,
            company: row.company,
            location: row.location,
            description: row.description,
            requirements: row.requirements,
            salary: row.salary,
            job_type: parse_column::<JobType>(&row.job_type)?,
            hr_id: row.hr_id,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct JobWithPosterRow {
    #[sqlx(flatten)]
    job: JobRow,
    hr_name: String,
    hr_email: String,
}

impl TryFrom<JobWithPosterRow> for JobWithPoster {
    type Error = Error;

    fn try_from(row: JobWithPosterRow) -> Result<Self> {
        Ok(Self {
            job: row.job.try_into()?,
            hr: JobPoster {
                name: row.hr_name,
                email: Some(row.hr_email),
            },
        })
    }
}

#[derive(FromRow)]
struct ApplicationRow {
    id: i64,
    job_id: i64,
    candidate_id: i64,
    status: String,
    response: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = Error;

    fn try_from(row: ApplicationRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            job_id: row.job_id,
            candidate_id: row.candidate_id,
            status: parse_column::<ApplicationStatus>(&row.status)?,
            response: row.response,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct CandidateApplicationRow {
    #[sqlx(flatten)]
    application: ApplicationRow,
    job_title: String,
    job_company: String,
    job_location: String,
    job_description: String,
    job_requirements: String,
    job_salary: Option<String>,
    job_type: String,
    job_hr_id: i64,
    job_created_at: DateTime<Utc>,
    hr_name: String,
}

impl TryFrom<CandidateApplicationRow> for CandidateApplication {
    type Error = Error;

    fn try_from(row: CandidateApplicationRow) -> Result<Self> {
        let job = Job {
            id: row.application.job_id,
            title: row.job_title,
            company: row.job_company,
            location: row.job_location,
            description: row.job_description,
            requirements: row.job_requirements,
            salary: row.job_salary,
            job_type: parse_column::<JobType>(&row.job_type)?,
            hr_id: row.job_hr_id,
            created_at: row.job_created_at,
        };
        Ok(Self {
            application: row.application.try_into()?,
            job: JobWithPoster {
                job,
                hr: JobPoster {
                    name: row.hr_name,
                    email: None,
                },
            },
        })
    }
}

#[derive(FromRow)]
struct JobApplicationRow {
    #[sqlx(flatten)]
    application: ApplicationRow,
    candidate_name: String,
    candidate_email: String,
    candidate_phone_number: Option<String>,
    job_title: String,
    job_company: String,
    job_location: String,
    job_type: String,
}

impl TryFrom<JobApplicationRow> for JobApplication {
    type Error = Error;

    fn try_from(row: JobApplicationRow) -> Result<Self> {
        Ok(Self {
            application: row.application.try_into()?,
            candidate: CandidateContact {
                name: row.candidate_name,
                email: row.candidate_email,
                phone_number: row.candidate_phone_number,
            },
            job: JobSummary {
                title: row.job_title,
                company: row.job_company,
                location: row.job_location,
                job_type: parse_column::<JobType>(&row.job_type)?,
            },
        })
    }
}

#[derive(FromRow)]
struct ProfileRow {
    id: i64,
    user_id: i64,
    location: Option<String>,
    roles_looking_for: Option<String>,
    technical_skills: Option<String>,
    soft_skills: Option<String>,
    tools_tech: Option<String>,
    degree: Option<String>,
    university: Option<String>,
    graduation_year: Option<String>,
    work_experience: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            fields: ProfileFields {
                location: row.location,
                roles_looking_for: row.roles_looking_for,
                technical_skills: row.technical_skills,
                soft_skills: row.soft_skills,
                tools_tech: row.tools_tech,
                degree: row.degree,
                university: row.university,
                graduation_year: row.graduation_year,
                work_experience: row.work_experience,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ProfileWithUserRow {
    #[sqlx(flatten)]
    profile: ProfileRow,
    user_name: String,
    user_email: String,
    user_phone_number: Option<String>,
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, phone_number, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, phone_number, password_hash, role, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, phone_number, password_hash, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, phone_number, password_hash, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn insert_job(&self, hr_id: i64, job: NewJob) -> Result<Job> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (title, company, location, description, requirements, salary, job_type, hr_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, company, location, description, requirements, salary, job_type, hr_id, created_at
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.salary)
        .bind(job.job_type.as_str())
        .bind(hr_id)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_job(&self, id: i64) -> Result<Option<JobWithPoster>> {
        let query = format!(
            "SELECT {}, u.name AS hr_name, u.email AS hr_email
             FROM jobs j
             JOIN users u ON u.id = j.hr_id
             WHERE j.id = $1",
            JOB_COLUMNS
        );
        let row = sqlx::query_as::<_, JobWithPosterRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<JobWithPoster>> {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(search) = &filter.search {
            filters.push(format!("j.title ILIKE ${}", args.len() + 1));
            args.push(like_pattern(search));
        }
        if let Some(location) = &filter.location {
            filters.push(format!("j.location ILIKE ${}", args.len() + 1));
            args.push(like_pattern(location));
        }
        if let Some(skills) = &filter.skills {
            filters.push(format!("j.requirements ILIKE ${}", args.len() + 1));
            args.push(like_pattern(skills));
        }

        let where_clause = if filters.is_empty() {
            "".to_string()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let query = format!(
            "SELECT {}, u.name AS hr_name, u.email AS hr_email
             FROM jobs j
             JOIN users u ON u.id = j.hr_id
             {}
             ORDER BY j.created_at DESC, j.id DESC",
            JOB_COLUMNS, where_clause
        );

        let mut statement = sqlx::query_as::<_, JobWithPosterRow>(&query);
        for value in &args {
            statement = statement.bind(value);
        }
        let rows = statement.fetch_all(&self.pool).await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_jobs_by_owner(&self, hr_id: i64) -> Result<Vec<JobWithPoster>> {
        let query = format!(
            "SELECT {}, u.name AS hr_name, u.email AS hr_email
             FROM jobs j
             JOIN users u ON u.id = j.hr_id
             WHERE j.hr_id = $1
             ORDER BY j.created_at DESC, j.id DESC",
            JOB_COLUMNS
        );
        let rows = sqlx::query_as::<_, JobWithPosterRow>(&query)
            .bind(hr_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_recent_jobs(&self, limit: i64) -> Result<Vec<JobWithPoster>> {
        let query = format!(
            "SELECT {}, u.name AS hr_name, u.email AS hr_email
             FROM jobs j
             JOIN users u ON u.id = j.hr_id
             ORDER BY j.created_at DESC, j.id DESC
             LIMIT $1",
            JOB_COLUMNS
        );
        let rows = sqlx::query_as::<_, JobWithPosterRow>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn count_jobs(&self) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn update_job(&self, id: i64, changes: JobChanges) -> Result<Option<Job>> {
        let salary_provided = changes.salary.is_some();
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs
            SET
                title = COALESCE($2, title),
                company = COALESCE($3, company),
                location = COALESCE($4, location),
                description = COALESCE($5, description),
                requirements = COALESCE($6, requirements),
                salary = CASE WHEN $7 THEN $8 ELSE salary END,
                job_type = COALESCE($9, job_type)
            WHERE id = $1
            RETURNING id, title, company, location, description, requirements, salary, job_type, hr_id, created_at
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.company)
        .bind(&changes.location)
        .bind(&changes.description)
        .bind(&changes.requirements)
        .bind(salary_provided)
        .bind(changes.salary.flatten())
        .bind(changes.job_type.map(|t| t.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn delete_job(&self, id: i64) -> Result<bool> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn insert_application(&self, job_id: i64, candidate_id: i64) -> Result<Application> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (job_id, candidate_id, status)
            VALUES ($1, $2, 'pending')
            RETURNING id, job_id, candidate_id, status, response, created_at, updated_at
            "#,
        )
        .bind(job_id)
        .bind(candidate_id)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_application(&self, id: i64) -> Result<Option<Application>> {
        let query = format!("SELECT {} FROM applications a WHERE a.id = $1", APPLICATION_COLUMNS);
        let row = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_applications_by_candidate(
        &self,
        candidate_id: i64,
    ) -> Result<Vec<CandidateApplication>> {
        let query = format!(
            "SELECT {},
                j.title AS job_title, j.company AS job_company, j.location AS job_location,
                j.description AS job_description, j.requirements AS job_requirements,
                j.salary AS job_salary, j.job_type, j.hr_id AS job_hr_id,
                j.created_at AS job_created_at, u.name AS hr_name
             FROM applications a
             JOIN jobs j ON j.id = a.job_id
             JOIN users u ON u.id = j.hr_id
             WHERE a.candidate_id = $1
             ORDER BY a.created_at DESC, a.id DESC",
            APPLICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, CandidateApplicationRow>(&query)
            .bind(candidate_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_applications_by_job(&self, job_id: i64) -> Result<Vec<JobApplication>> {
        let query = format!(
            "SELECT {},
                c.name AS candidate_name, c.email AS candidate_email,
                c.phone_number AS candidate_phone_number,
                j.title AS job_title, j.company AS job_company, j.location AS job_location,
                j.job_type
             FROM applications a
             JOIN users c ON c.id = a.candidate_id
             JOIN jobs j ON j.id = a.job_id
             WHERE a.job_id = $1
             ORDER BY a.created_at DESC, a.id DESC",
            APPLICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, JobApplicationRow>(&query)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn set_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
        response: Option<String>,
    ) -> Result<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            UPDATE applications
            SET status = $2, response = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, job_id, candidate_id, status, response, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(response)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn count_applications_by_owner(
        &self,
        hr_id: i64,
    ) -> Result<Vec<(i64, ApplicationStatus, i64)>> {
        let rows = sqlx::query_as::<_, (i64, String, i64)>(
            r#"
            SELECT a.job_id, a.status, COUNT(*)
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE j.hr_id = $1
            GROUP BY a.job_id, a.status
            "#,
        )
        .bind(hr_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(job_id, status, count)| Ok((job_id, parse_column(&status)?, count)))
            .collect()
    }

    async fn find_recent_applications_by_owner(
        &self,
        hr_id: i64,
        per_job: i64,
        limit: i64,
    ) -> Result<Vec<JobApplication>> {
        let query = format!(
            "SELECT {},
                c.name AS candidate_name, c.email AS candidate_email,
                c.phone_number AS candidate_phone_number,
                j.title AS job_title, j.company AS job_company, j.location AS job_location,
                j.job_type
             FROM (
                SELECT ap.*, ROW_NUMBER() OVER (
                    PARTITION BY ap.job_id ORDER BY ap.created_at DESC, ap.id DESC
                ) AS job_rank
                FROM applications ap
                JOIN jobs owned ON owned.id = ap.job_id
                WHERE owned.hr_id = $1
             ) a
             JOIN users c ON c.id = a.candidate_id
             JOIN jobs j ON j.id = a.job_id
             WHERE a.job_rank <= $2
             ORDER BY j.created_at DESC, j.id DESC, a.created_at DESC, a.id DESC
             LIMIT $3",
            APPLICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, JobApplicationRow>(&query)
            .bind(hr_id)
            .bind(per_job)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn find_profile(&self, user_id: i64) -> Result<Option<ProfileWithUser>> {
        let query = format!(
            "SELECT {}, u.name AS user_name, u.email AS user_email, u.phone_number AS user_phone_number
             FROM profiles p
             JOIN users u ON u.id = p.user_id
             WHERE p.user_id = $1",
            PROFILE_COLUMNS
        );
        let row = sqlx::query_as::<_, ProfileWithUserRow>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| ProfileWithUser {
            profile: row.profile.into(),
            user: ProfileOwner {
                name: row.user_name,
                email: row.user_email,
                phone_number: row.user_phone_number,
            },
        }))
    }

    async fn upsert_profile(&self, user_id: i64, fields: ProfileFields) -> Result<Profile> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (
                user_id, location, roles_looking_for, technical_skills, soft_skills,
                tools_tech, degree, university, graduation_year, work_experience
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id) DO UPDATE SET
                location = EXCLUDED.location,
                roles_looking_for = EXCLUDED.roles_looking_for,
                technical_skills = EXCLUDED.technical_skills,
                soft_skills = EXCLUDED.soft_skills,
                tools_tech = EXCLUDED.tools_tech,
                degree = EXCLUDED.degree,
                university = EXCLUDED.university,
                graduation_year = EXCLUDED.graduation_year,
                work_experience = EXCLUDED.work_experience,
                updated_at = NOW()
            RETURNING id, user_id, location, roles_looking_for, technical_skills, soft_skills,
                tools_tech, degree, university, graduation_year, work_experience,
                created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(fields.location)
        .bind(fields.roles_looking_for)
        .bind(fields.technical_skills)
        .bind(fields.soft_skills)
        .bind(fields.tools_tech)
        .bind(fields.degree)
        .bind(fields.university)
        .bind(fields.graduation_year)
        .bind(fields.work_experience)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("c_sharp"), "%c\\_sharp%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn corrupt_enum_values_surface_as_internal_errors() {
        let err = parse_column::<JobType>("seasonal").unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }
}
