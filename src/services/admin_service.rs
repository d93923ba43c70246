use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{
    cv::CvWithApplicant,
    event::{AdminEventView, Event},
    job::Job,
    notification::{Notification, NotificationDraft},
    user::{BanUpdate, Role, User},
};
use crate::repository::{
    CvRepository, EventRepository, JobRepository, ProfileRepository, UserRepository,
};
use crate::services::{notification_service::NotificationService, upload_service::UploadStore};
use crate::utils::{time::now, validation::non_blank};

const NO_REASON: &str = "No reason provided";

/// Moderation over users, postings and events.
#[derive(Clone)]
pub struct AdminService {
    users: Arc<dyn UserRepository>,
    profiles: Arc<dyn ProfileRepository>,
    cvs: Arc<dyn CvRepository>,
    jobs: Arc<dyn JobRepository>,
    events: Arc<dyn EventRepository>,
    notifications: NotificationService,
    uploads: UploadStore,
}

impl AdminService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepository>,
        profiles: Arc<dyn ProfileRepository>,
        cvs: Arc<dyn CvRepository>,
        jobs: Arc<dyn JobRepository>,
        events: Arc<dyn EventRepository>,
        notifications: NotificationService,
        uploads: UploadStore,
    ) -> Self {
        Self {
            users,
            profiles,
            cvs,
            jobs,
            events,
            notifications,
            uploads,
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.users.list().await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    /// Removes a non-admin user with its profiles and CV, then drops the
    /// files those records referenced.
    pub async fn delete_user(&self, id: Uuid) -> Result<User> {
        let user = self.get_user(id).await?;
        if user.role == Role::Admin {
            return Err(Error::Forbidden("Cannot delete admin user".to_string()));
        }

        let files = self.files_owned_by(id).await?;
        if !self.users.delete(id).await? {
            return Err(Error::NotFound("User not found".to_string()));
        }
        self.uploads.remove_all(&files).await;

        tracing::info!(user_id = %id, files = files.len(), "user deleted by admin");
        Ok(user)
    }

    pub async fn change_role(&self, id: Uuid, role: Option<&str>) -> Result<User> {
        let role = role.and_then(Role::parse).ok_or_else(|| {
            Error::BadRequest("Invalid role. Must be: applicant, recruiter, or admin".to_string())
        })?;

        let user = self.get_user(id).await?;
        if user.role == Role::Admin {
            return Err(Error::Forbidden(
                "Cannot change the role of an admin user".to_string(),
            ));
        }

        let updated = self
            .users
            .update_role(id, role)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        tracing::info!(user_id = %id, role = role.as_str(), "user role changed");
        Ok(updated)
    }

    pub async fn set_ban(&self, id: Uuid, banned: bool, reason: Option<&str>) -> Result<User> {
        let user = self.get_user(id).await?;
        if user.role == Role::Admin {
            return Err(Error::Forbidden("Cannot ban admin user".to_string()));
        }

        let update = if banned {
            BanUpdate {
                banned: true,
                ban_reason: Some(non_blank(reason).unwrap_or(NO_REASON).to_string()),
                banned_at: Some(now()),
            }
        } else {
            BanUpdate {
                banned: false,
                ban_reason: None,
                banned_at: None,
            }
        };

        let updated = self
            .users
            .update_ban(id, update)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        tracing::info!(user_id = %id, banned, "user ban updated");
        Ok(updated)
    }

    /// Notifies the owning recruiter, then removes the posting. A failed
    /// notification aborts the delete.
    pub async fn delete_job(
        &self,
        id: Uuid,
        reason: Option<&str>,
        admin_id: Uuid,
    ) -> Result<(Job, Notification)> {
        let job = self
            .jobs
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;

        let draft = NotificationDraft::job_deleted(
            &job.title,
            non_blank(reason).unwrap_or(NO_REASON).to_string(),
            Some(admin_id),
        );
        let notification = self.notifications.notify(job.recruiter_id, &draft).await?;

        self.jobs.delete(id).await?;
        tracing::info!(job_id = %id, admin_id = %admin_id, "job removed by admin");
        Ok((job, notification))
    }

    pub async fn delete_event(
        &self,
        id: Uuid,
        reason: Option<&str>,
        admin_id: Uuid,
    ) -> Result<Event> {
        let event = self
            .events
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Event not found".to_string()))?;

        if let Some(creator) = event.created_by {
            let draft = NotificationDraft::event_deleted(
                &event.title,
                non_blank(reason).unwrap_or(NO_REASON).to_string(),
                Some(admin_id),
            );
            self.notifications.notify(creator, &draft).await?;
        }

        self.events.delete(id).await?;
        tracing::info!(event_id = %id, admin_id = %admin_id, "event removed by admin");
        Ok(event)
    }

    /// All events, soonest first, with the creator's email where known.
    pub async fn list_events(&self) -> Result<Vec<AdminEventView>> {
        let events = self.events.list().await?;

        let mut emails: HashMap<Uuid, Option<String>> = HashMap::new();
        for creator in events.iter().filter_map(|e| e.created_by) {
            if !emails.contains_key(&creator) {
                let email = self.users.find_by_id(creator).await?.map(|u| u.email);
                emails.insert(creator, email);
            }
        }

        Ok(events
            .into_iter()
            .map(|event| {
                let creator_email = event
                    .created_by
                    .and_then(|creator| emails.get(&creator).cloned().flatten());
                AdminEventView {
                    event,
                    creator_email,
                }
            })
            .collect())
    }

    pub async fn list_cvs(&self) -> Result<Vec<CvWithApplicant>> {
        self.cvs.list_with_applicants().await
    }

    async fn files_owned_by(&self, user_id: Uuid) -> Result<Vec<String>> {
        let mut files = Vec::new();
        if let Some(applicant) = self.profiles.find_applicant(user_id).await? {
            files.extend(applicant.profile_picture);
            if let Some(cv) = self.cvs.find_by_applicant(applicant.id).await? {
                files.extend(cv.cv_document);
                files.extend(cv.certificate_files);
            }
        }
        if let Some(recruiter) = self.profiles.find_recruiter(user_id).await? {
            files.extend(recruiter.profile_picture);
        }
        Ok(files)
    }
}
