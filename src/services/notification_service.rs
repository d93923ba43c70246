use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{
    notification::{Notification, NotificationDraft},
    user::Role,
};
use crate::repository::{NotificationRepository, UserRepository};

/// Per-user in-app inbox plus the fan-out used when jobs and events are
/// published.
#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
    users: Arc<dyn UserRepository>,
}

impl NotificationService {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            notifications,
            users,
        }
    }

    /// Delivers one notification. Failures propagate to the caller.
    pub async fn notify(&self, user_id: Uuid, draft: &NotificationDraft) -> Result<Notification> {
        self.notifications.create(user_id, draft).await
    }

    /// Sends `draft` to every applicant-role user that exists right now.
    ///
    /// Best effort: any storage failure is logged and swallowed, and the
    /// number of notifications actually written is returned.
    pub async fn notify_applicants(&self, draft: &NotificationDraft) -> u64 {
        let recipients = match self.users.list_ids_by_role(Role::Applicant).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(error = %e, kind = ?draft.kind, "failed to load fan-out recipients");
                return 0;
            }
        };
        if recipients.is_empty() {
            return 0;
        }

        match self.notifications.create_many(&recipients, draft).await {
            Ok(written) => {
                tracing::info!(kind = ?draft.kind, recipients = written, "fan-out notifications created");
                written
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    kind = ?draft.kind,
                    recipients = recipients.len(),
                    "failed to create fan-out notifications"
                );
                0
            }
        }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        self.notifications.list_for_user(user_id).await
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<Notification> {
        self.notifications
            .mark_read(id)
            .await?
            .ok_or_else(|| Error::NotFound("Notification not found".to_string()))
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        self.notifications.mark_all_read(user_id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if self.notifications.delete(id).await? {
            Ok(())
        } else {
            Err(Error::NotFound("Notification not found".to_string()))
        }
    }
}
