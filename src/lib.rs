pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

use std::sync::Arc;

use crate::config::Config;
use crate::repository::Repositories;
use crate::services::{
    admin_service::AdminService, application_service::ApplicationService,
    auth_service::AuthService, cv_service::CvService, event_service::EventService,
    job_service::JobService, notification_service::NotificationService,
    profile_service::ProfileService, upload_service::UploadStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub notification_service: NotificationService,
    pub event_service: EventService,
    pub admin_service: AdminService,
    pub profile_service: ProfileService,
    pub cv_service: CvService,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories) -> Self {
        let uploads = UploadStore::new(config.uploads_dir.clone());

        let notification_service =
            NotificationService::new(repos.notifications.clone(), repos.users.clone());
        let auth_service = AuthService::new(
            repos.users.clone(),
            config.jwt_secret.clone(),
            config.session_ttl_hours,
        );
        let job_service = JobService::new(repos.jobs.clone(), notification_service.clone());
        let application_service = ApplicationService::new(
            repos.applications.clone(),
            repos.jobs.clone(),
            notification_service.clone(),
        );
        let event_service = EventService::new(repos.events.clone(), notification_service.clone());
        let admin_service = AdminService::new(
            repos.users.clone(),
            repos.profiles.clone(),
            repos.cvs.clone(),
            repos.jobs.clone(),
            repos.events.clone(),
            notification_service.clone(),
            uploads.clone(),
        );
        let profile_service = ProfileService::new(repos.profiles.clone(), uploads.clone());
        let cv_service = CvService::new(repos.profiles, repos.cvs, uploads);

        Self {
            config: Arc::new(config),
            auth_service,
            job_service,
            application_service,
            notification_service,
            event_service,
            admin_service,
            profile_service,
            cv_service,
        }
    }
}
