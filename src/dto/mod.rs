pub mod admin_dto;
pub mod application_dto;
pub mod auth_dto;
pub mod cv_dto;
pub mod event_dto;
pub mod job_dto;
pub mod profile_dto;
