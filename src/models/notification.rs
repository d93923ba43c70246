use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewJob,
    NewEvent,
    ApplicationAccepted,
    ApplicationRejected,
    JobDeleted,
    EventDeleted,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub reason: Option<String>,
    pub job_title: Option<String>,
    pub admin_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Recipient-independent notification content. Fan-out stamps one copy per
/// recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub reason: Option<String>,
    pub job_title: Option<String>,
    pub admin_id: Option<Uuid>,
}

impl NotificationDraft {
    pub fn new_job(title: &str, location: &str) -> Self {
        Self {
            kind: NotificationKind::NewJob,
            title: "New Job Posted! 💼".to_string(),
            message: format!(
                "A new position \"{}\" is now available in {}.",
                title, location
            ),
            reason: None,
            job_title: Some(title.to_string()),
            admin_id: None,
        }
    }

    pub fn new_event(title: &str, date: NaiveDate) -> Self {
        Self {
            kind: NotificationKind::NewEvent,
            title: "New Event! 📅".to_string(),
            message: format!(
                "Don't miss \"{}\" on {}.",
                title,
                date.format("%Y-%m-%d")
            ),
            reason: None,
            job_title: None,
            admin_id: None,
        }
    }

    pub fn application_accepted(job_title: &str) -> Self {
        Self {
            kind: NotificationKind::ApplicationAccepted,
            title: "Application Accepted! 🎉".to_string(),
            message: format!(
                "Congratulations! Your application for \"{}\" has been accepted.",
                job_title
            ),
            reason: None,
            job_title: Some(job_title.to_string()),
            admin_id: None,
        }
    }

    pub fn application_rejected(job_title: &str) -> Self {
        Self {
            kind: NotificationKind::ApplicationRejected,
            title: "Application Update".to_string(),
            message: format!(
                "Your application for \"{}\" has been reviewed and was not selected.",
                job_title
            ),
            reason: None,
            job_title: Some(job_title.to_string()),
            admin_id: None,
        }
    }

    pub fn job_deleted(job_title: &str, reason: String, admin_id: Option<Uuid>) -> Self {
        Self {
            kind: NotificationKind::JobDeleted,
            title: "Job Posting Removed".to_string(),
            message: format!(
                "Your job posting \"{}\" has been removed by an administrator.",
                job_title
            ),
            reason: Some(reason),
            job_title: Some(job_title.to_string()),
            admin_id,
        }
    }

    pub fn event_deleted(event_title: &str, reason: String, admin_id: Option<Uuid>) -> Self {
        Self {
            kind: NotificationKind::EventDeleted,
            title: "Event Removed".to_string(),
            message: format!(
                "Your event \"{}\" has been removed by an administrator.",
                event_title
            ),
            reason: Some(reason),
            job_title: None,
            admin_id,
        }
    }
}
