mod session;

pub use session::{logout, Session};

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::dto::{
    application_dto::{ApplicationMessageResponse, UpdateStatusPayload},
    auth_dto::{AuthResponse, LoginPayload, SignupPayload},
    dashboard_dto::DashboardSummary,
    job_dto::{
        CreateJobPayload, JobListQuery, JobMessageResponse, MessageResponse, UpdateJobPayload,
    },
    profile_dto::ProfileMessageResponse,
};
use crate::models::{
    application::{Application, CandidateApplication, JobApplication},
    job::{Job, JobWithPoster},
    profile::{Profile, ProfileFields, ProfileWithUser},
    user::UserSummary,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with an error status. `message` is the server's
    /// `error` field when it sent one.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Typed HTTP client for the job board API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn signup(&self, payload: &SignupPayload) -> ClientResult<Session> {
        let response: AuthResponse = self
            .send(self.request(Method::POST, "/api/auth/signup").json(payload))
            .await?;
        Ok(response.into())
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let payload = LoginPayload {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self
            .send(self.request(Method::POST, "/api/auth/login").json(&payload))
            .await?;
        Ok(response.into())
    }

    pub async fn current_user(&self, session: &Session) -> ClientResult<UserSummary> {
        let path = format!("/api/auth/user/{}", session.user_id);
        self.send(self.authed(Method::GET, &path, session)).await
    }

    pub async fn list_jobs(&self, query: &JobListQuery) -> ClientResult<Vec<JobWithPoster>> {
        self.send(self.request(Method::GET, "/api/jobs").query(query))
            .await
    }

    pub async fn get_job(&self, id: i64) -> ClientResult<JobWithPoster> {
        self.send(self.request(Method::GET, &format!("/api/jobs/{}", id)))
            .await
    }

    pub async fn create_job(
        &self,
        session: &Session,
        payload: &CreateJobPayload,
    ) -> ClientResult<Job> {
        let path = format!("/api/jobs/create/{}", session.user_id);
        let response: JobMessageResponse = self
            .send(self.authed(Method::POST, &path, session).json(payload))
            .await?;
        Ok(response.job)
    }

    pub async fn update_job(
        &self,
        session: &Session,
        id: i64,
        payload: &UpdateJobPayload,
    ) -> ClientResult<Job> {
        let path = format!("/api/jobs/{}", id);
        let response: JobMessageResponse = self
            .send(self.authed(Method::PUT, &path, session).json(payload))
            .await?;
        Ok(response.job)
    }

    pub async fn delete_job(&self, session: &Session, id: i64) -> ClientResult<()> {
        let path = format!("/api/jobs/{}", id);
        let _: MessageResponse = self.send(self.authed(Method::DELETE, &path, session)).await?;
        Ok(())
    }

    pub async fn my_jobs(&self, session: &Session) -> ClientResult<Vec<JobWithPoster>> {
        let path = format!("/api/jobs/hr/{}", session.user_id);
        self.send(self.authed(Method::GET, &path, session)).await
    }

    pub async fn apply(&self, session: &Session, job_id: i64) -> ClientResult<Application> {
        let path = format!("/api/jobs/apply/{}/{}", job_id, session.user_id);
        let response: ApplicationMessageResponse =
            self.send(self.authed(Method::POST, &path, session)).await?;
        Ok(response.application)
    }

    pub async fn my_applications(
        &self,
        session: &Session,
    ) -> ClientResult<Vec<CandidateApplication>> {
        let path = format!("/api/jobs/applications/{}", session.user_id);
        self.send(self.authed(Method::GET, &path, session)).await
    }

    pub async fn job_applications(
        &self,
        session: &Session,
        job_id: i64,
    ) -> ClientResult<Vec<JobApplication>> {
        let path = format!("/api/jobs/{}/applications", job_id);
        self.send(self.authed(Method::GET, &path, session)).await
    }

    pub async fn update_application_status(
        &self,
        session: &Session,
        application_id: i64,
        status: &str,
        response: Option<&str>,
    ) -> ClientResult<Application> {
        let path = format!("/api/jobs/applications/{}/status", application_id);
        let payload = UpdateStatusPayload {
            status: Some(status.to_string()),
            response: response.map(str::to_string),
        };
        let body: ApplicationMessageResponse = self
            .send(self.authed(Method::PUT, &path, session).json(&payload))
            .await?;
        Ok(body.application)
    }

    pub async fn profile(&self, session: &Session) -> ClientResult<ProfileWithUser> {
        let path = format!("/api/profile/{}", session.user_id);
        self.send(self.authed(Method::GET, &path, session)).await
    }

    pub async fn save_profile(
        &self,
        session: &Session,
        fields: &ProfileFields,
    ) -> ClientResult<Profile> {
        let path = format!("/api/profile/{}", session.user_id);
        let response: ProfileMessageResponse = self
            .send(self.authed(Method::PUT, &path, session).json(fields))
            .await?;
        Ok(response.profile)
    }

    pub async fn dashboard(&self, session: &Session) -> ClientResult<DashboardSummary> {
        self.send(self.authed(Method::GET, "/api/dashboard", session))
            .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    fn authed(&self, method: Method, path: &str, session: &Session) -> RequestBuilder {
        self.request(method, path)
            .header(reqwest::header::AUTHORIZATION, session.bearer())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(response.json::<T>().await?);
        }
        Err(api_error(response).await)
    }
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status();
    let message = match response.json::<ErrorBody>().await {
        Ok(ErrorBody { error: Some(message) }) => message,
        _ => fallback_message(status),
    };
    tracing::debug!(%status, %message, "API request failed");
    ClientError::Api { status, message }
}

fn fallback_message(status: StatusCode) -> String {
    format!("Request failed with status {}", status.as_u16())
}
