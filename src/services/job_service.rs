use std::sync::Arc;

use uuid::Uuid;

use crate::dto::job_dto::JobPayload;
use crate::error::{Error, Result};
use crate::models::{job::Job, notification::NotificationDraft};
use crate::repository::JobRepository;
use crate::services::notification_service::NotificationService;

const CREATE_REQUIRED: &str =
    "title, details, location, type, deadline, recruiterId/postedBy are required";
const UPDATE_REQUIRED: &str = "Title, details, location, type and deadline are required";

#[derive(Clone)]
pub struct JobService {
    jobs: Arc<dyn JobRepository>,
    notifications: NotificationService,
}

impl JobService {
    pub fn new(jobs: Arc<dyn JobRepository>, notifications: NotificationService) -> Self {
        Self {
            jobs,
            notifications,
        }
    }

    /// Persists the posting, then announces it to every applicant. The
    /// announcement is best effort and never fails the create.
    pub async fn create(&self, payload: JobPayload) -> Result<Job> {
        let recruiter_id = payload
            .recruiter()
            .ok_or_else(|| Error::BadRequest(CREATE_REQUIRED.to_string()))?;
        let fields = payload.job_fields(CREATE_REQUIRED)?;

        let job = self.jobs.create(recruiter_id, fields).await?;
        tracing::info!(job_id = %job.id, recruiter_id = %recruiter_id, "job created");

        let draft = NotificationDraft::new_job(&job.title, &job.location);
        self.notifications.notify_applicants(&draft).await;

        Ok(job)
    }

    pub async fn get(&self, id: Uuid) -> Result<Job> {
        self.jobs
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Job>> {
        self.jobs.list().await
    }

    pub async fn list_by_recruiter(&self, recruiter_id: Uuid) -> Result<Vec<Job>> {
        self.jobs.list_by_recruiter(recruiter_id).await
    }

    pub async fn update(&self, id: Uuid, payload: JobPayload) -> Result<Job> {
        let fields = payload.job_fields(UPDATE_REQUIRED)?;
        self.jobs
            .update(id, fields)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<Job> {
        let job = self
            .jobs
            .delete(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        tracing::info!(job_id = %id, "job deleted by owner");
        Ok(job)
    }
}
