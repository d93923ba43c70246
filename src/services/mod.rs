pub mod admin_service;
pub mod application_service;
pub mod auth_service;
pub mod cv_service;
pub mod event_service;
pub mod job_service;
pub mod notification_service;
pub mod profile_service;
pub mod upload_service;
