//! Storage seams for the portal.
//!
//! Services only talk to these traits. `PgStore` backs them in production and
//! `MemoryStore` in tests; both enforce the same uniqueness rules (one user
//! per email, one application per job and user, one CV per applicant).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{memory::MemoryStore, postgres::PgStore};
use crate::error::Result;
use crate::models::{
    application::{Application, ApplicationStatus, NewApplication, StatusTransition},
    cv::{Cv, CvFields, CvWithApplicant},
    event::{Event, EventFields},
    job::{Job, JobFields},
    notification::{Notification, NotificationDraft},
    profile::{Applicant, ApplicantFields, Recruiter, RecruiterFields},
    user::{BanUpdate, NewUser, Role, User},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Error::Conflict` when the email is taken.
    async fn create(&self, user: NewUser) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Newest first.
    async fn list(&self) -> Result<Vec<User>>;
    async fn list_ids_by_role(&self, role: Role) -> Result<Vec<Uuid>>;
    async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<User>>;
    async fn update_ban(&self, id: Uuid, ban: BanUpdate) -> Result<Option<User>>;
    /// Removes the user together with its profile and CV rows.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_applicant(&self, user_id: Uuid) -> Result<Option<Applicant>>;
    /// Returns the applicant row for `user_id`, creating an empty one if needed.
    async fn ensure_applicant(&self, user_id: Uuid) -> Result<Applicant>;
    async fn upsert_applicant(&self, user_id: Uuid, fields: ApplicantFields) -> Result<Applicant>;
    async fn set_applicant_picture(
        &self,
        user_id: Uuid,
        picture: Option<String>,
    ) -> Result<Applicant>;

    async fn find_recruiter(&self, user_id: Uuid) -> Result<Option<Recruiter>>;
    async fn upsert_recruiter(&self, user_id: Uuid, fields: RecruiterFields) -> Result<Recruiter>;
    async fn set_recruiter_picture(
        &self,
        user_id: Uuid,
        picture: Option<String>,
    ) -> Result<Recruiter>;
}

#[async_trait]
pub trait CvRepository: Send + Sync {
    async fn find_by_applicant(&self, applicant_id: Uuid) -> Result<Option<Cv>>;
    /// Inserts the applicant's CV or rewrites it in place.
    async fn upsert(&self, applicant_id: Uuid, fields: CvFields) -> Result<Cv>;
    async fn delete_by_applicant(&self, applicant_id: Uuid) -> Result<Option<Cv>>;
    async fn list_with_applicants(&self) -> Result<Vec<CvWithApplicant>>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, recruiter_id: Uuid, fields: JobFields) -> Result<Job>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>>;
    /// Newest first.
    async fn list(&self) -> Result<Vec<Job>>;
    async fn list_by_recruiter(&self, recruiter_id: Uuid) -> Result<Vec<Job>>;
    async fn update(&self, id: Uuid, fields: JobFields) -> Result<Option<Job>>;
    async fn delete(&self, id: Uuid) -> Result<Option<Job>>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Fails with `Error::Conflict` when the user already applied to the job.
    /// The check and the insert are a single atomic step.
    async fn create(&self, application: NewApplication) -> Result<Application>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>>;
    async fn list(&self) -> Result<Vec<Application>>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Application>>;
    async fn list_by_job(&self, job_id: Uuid) -> Result<Vec<Application>>;
    /// Writes the status, replaces notes only when `notes` is `Some`, and
    /// reports the status that was overwritten.
    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        notes: Option<String>,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Option<StatusTransition>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, user_id: Uuid, draft: &NotificationDraft) -> Result<Notification>;
    /// One row per recipient, written in a single statement.
    async fn create_many(&self, user_ids: &[Uuid], draft: &NotificationDraft) -> Result<u64>;
    /// Newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>>;
    async fn mark_read(&self, id: Uuid) -> Result<Option<Notification>>;
    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, fields: EventFields, created_by: Option<Uuid>) -> Result<Event>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>>;
    /// Soonest first.
    async fn list(&self) -> Result<Vec<Event>>;
    async fn update(&self, id: Uuid, fields: EventFields) -> Result<Option<Event>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub cvs: Arc<dyn CvRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub events: Arc<dyn EventRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            users: store.clone(),
            profiles: store.clone(),
            cvs: store.clone(),
            jobs: store.clone(),
            applications: store.clone(),
            notifications: store.clone(),
            events: store,
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            profiles: store.clone(),
            cvs: store.clone(),
            jobs: store.clone(),
            applications: store.clone(),
            notifications: store.clone(),
            events: store,
        }
    }
}
