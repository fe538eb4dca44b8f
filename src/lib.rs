pub mod client;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::store::Store;
use crate::services::{
    application_service::ApplicationService, auth_service::AuthService,
    dashboard_service::DashboardService, job_service::JobService,
    profile_service::ProfileService,
};
use crate::utils::token::TokenSigner;

#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenSigner,
    pub auth_service: AuthService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub profile_service: ProfileService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, config: &Config) -> Self
    where
        S: Store + 'static,
    {
        let tokens = TokenSigner::new(&config.jwt_secret, config.token_ttl_hours);

        let auth_service = AuthService::new(store.clone(), tokens.clone());
        let job_service = JobService::new(store.clone());
        let application_service = ApplicationService::new(store.clone(), store.clone());
        let profile_service = ProfileService::new(store.clone());
        let dashboard_service = DashboardService::new(store.clone(), store);

        Self {
            tokens,
            auth_service,
            job_service,
            application_service,
            profile_service,
            dashboard_service,
        }
    }
}
