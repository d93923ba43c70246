use std::sync::Arc;

use uuid::Uuid;

use crate::dto::application_dto::{ApplyPayload, StatusPayload};
use crate::error::{Error, Result};
use crate::models::{
    application::{Application, ApplicationStatus, NewApplication},
    notification::NotificationDraft,
};
use crate::repository::{ApplicationRepository, JobRepository};
use crate::services::notification_service::NotificationService;
use crate::utils::{time::now, validation::non_blank};

#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    jobs: Arc<dyn JobRepository>,
    notifications: NotificationService,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        jobs: Arc<dyn JobRepository>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            applications,
            jobs,
            notifications,
        }
    }

    /// Files a pending application. A second application for the same job
    /// and user is rejected by the store itself, so concurrent duplicates
    /// cannot both succeed.
    pub async fn apply(&self, payload: ApplyPayload) -> Result<Application> {
        let (Some(job_id), Some(user_id)) = (payload.job_id, payload.user_id) else {
            return Err(Error::BadRequest(
                "Please login first to apply for a job".to_string(),
            ));
        };

        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;

        let application = self
            .applications
            .create(NewApplication {
                job_id,
                user_id,
                job_title: job.title,
            })
            .await?;

        tracing::info!(application_id = %application.id, job_id = %job_id, user_id = %user_id, "application submitted");
        Ok(application)
    }

    pub async fn list(&self) -> Result<Vec<Application>> {
        self.applications.list().await
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Application>> {
        self.applications.list_by_user(user_id).await
    }

    pub async fn list_by_job(&self, job_id: Uuid) -> Result<Vec<Application>> {
        self.applications.list_by_job(job_id).await
    }

    /// Records a review decision. The applicant hears about it only when the
    /// status actually changed to `accepted` or `rejected`.
    pub async fn update_status(&self, id: Uuid, payload: StatusPayload) -> Result<Application> {
        let status = payload
            .status
            .as_deref()
            .and_then(ApplicationStatus::parse)
            .ok_or_else(|| {
                Error::BadRequest(
                    "Valid status (pending, accepted, rejected) is required".to_string(),
                )
            })?;
        let notes = non_blank(payload.notes.as_deref()).map(str::to_string);

        let transition = self
            .applications
            .update_status(id, status, notes, now())
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

        if transition.changed() {
            let application = &transition.application;
            let draft = match application.status {
                ApplicationStatus::Accepted => {
                    Some(NotificationDraft::application_accepted(&application.job_title))
                }
                ApplicationStatus::Rejected => {
                    Some(NotificationDraft::application_rejected(&application.job_title))
                }
                ApplicationStatus::Pending => None,
            };
            if let Some(draft) = draft {
                self.notifications
                    .notify(application.user_id, &draft)
                    .await?;
            }
        }

        tracing::info!(
            application_id = %id,
            from = transition.previous.as_str(),
            to = status.as_str(),
            "application status updated"
        );
        Ok(transition.application)
    }
}
