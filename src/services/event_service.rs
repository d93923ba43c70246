use std::sync::Arc;

use uuid::Uuid;

use crate::dto::event_dto::{CreateEventPayload, UpdateEventPayload};
use crate::error::{Error, Result};
use crate::models::{
    event::{Event, EventFields},
    notification::NotificationDraft,
};
use crate::repository::EventRepository;
use crate::services::notification_service::NotificationService;
use crate::utils::{
    time::{parse_date, today},
    validation::{non_blank, require_all},
};

#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventRepository>,
    notifications: NotificationService,
}

impl EventService {
    pub fn new(events: Arc<dyn EventRepository>, notifications: NotificationService) -> Self {
        Self {
            events,
            notifications,
        }
    }

    pub async fn create(&self, payload: CreateEventPayload) -> Result<Event> {
        let fields = event_fields(
            payload.title.as_deref(),
            payload.date.as_deref(),
            payload.description.as_deref(),
        )?;

        let event = self.events.create(fields, payload.created_by).await?;
        tracing::info!(event_id = %event.id, date = %event.date, "event created");

        let draft = NotificationDraft::new_event(&event.title, event.date);
        self.notifications.notify_applicants(&draft).await;

        Ok(event)
    }

    pub async fn get(&self, id: Uuid) -> Result<Event> {
        self.events
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Event not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Event>> {
        self.events.list().await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateEventPayload) -> Result<Event> {
        require_all(
            &[payload.title.as_deref(), payload.date.as_deref()],
            "Title and date are required",
        )?;
        let event = self.get(id).await?;
        ensure_owner(&event, payload.user_id, "You can only update events you created")?;

        let fields = event_fields(
            payload.title.as_deref(),
            payload.date.as_deref(),
            payload.description.as_deref(),
        )?;
        self.events
            .update(id, fields)
            .await?
            .ok_or_else(|| Error::NotFound("Event not found".to_string()))
    }

    /// Owner-path delete. Events without a recorded creator may be removed by
    /// anyone; otherwise the caller must be the creator.
    pub async fn delete(&self, id: Uuid, user_id: Option<Uuid>) -> Result<Event> {
        let event = self.get(id).await?;
        ensure_owner(&event, user_id, "You can only delete events you created")?;

        if !self.events.delete(id).await? {
            return Err(Error::NotFound("Event not found".to_string()));
        }
        tracing::info!(event_id = %id, "event deleted");
        Ok(event)
    }
}

fn ensure_owner(event: &Event, user_id: Option<Uuid>, message: &str) -> Result<()> {
    match event.created_by {
        Some(owner) if user_id != Some(owner) => Err(Error::Forbidden(message.to_string())),
        _ => Ok(()),
    }
}

/// Validates the writable fields. The date must fall strictly after today
/// (UTC, compared as calendar dates).
fn event_fields(
    title: Option<&str>,
    date: Option<&str>,
    description: Option<&str>,
) -> Result<EventFields> {
    let (Some(title), Some(date)) = (non_blank(title), non_blank(date)) else {
        return Err(Error::BadRequest("Title and date are required".to_string()));
    };
    let date = parse_date(date).ok_or_else(|| Error::BadRequest("Invalid event date".to_string()))?;
    if date <= today() {
        return Err(Error::BadRequest(
            "Event date must be in the future".to_string(),
        ));
    }

    Ok(EventFields {
        title: title.to_string(),
        date,
        description: description.unwrap_or_default().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::models::{
        notification::NotificationKind,
        user::{NewUser, Role},
    };
    use crate::repository::UserRepository;
    use chrono::Duration;

    fn service(store: &Arc<MemoryStore>) -> (EventService, NotificationService) {
        let notifications = NotificationService::new(store.clone(), store.clone());
        (
            EventService::new(store.clone(), notifications.clone()),
            notifications,
        )
    }

    fn days_from_today(days: i64) -> String {
        (today() + Duration::days(days)).format("%Y-%m-%d").to_string()
    }

    fn create(date: String, created_by: Option<Uuid>) -> CreateEventPayload {
        CreateEventPayload {
            title: Some("Career Fair".into()),
            date: Some(date),
            description: None,
            created_by,
        }
    }

    #[tokio::test]
    async fn today_and_past_dates_are_rejected() {
        let store = Arc::new(MemoryStore::new());
        let (events, _) = service(&store);

        for offset in [0, -1, -30] {
            let err = events
                .create(create(days_from_today(offset), None))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::BadRequest(ref m) if m == "Event date must be in the future"));
        }
        assert!(events.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_announces_to_applicants() {
        let store = Arc::new(MemoryStore::new());
        let applicant = UserRepository::create(
            store.as_ref(),
            NewUser {
                email: "a@x.com".into(),
                password_hash: "h".into(),
                role: Role::Applicant,
            },
        )
        .await
        .unwrap();
        let (events, notifications) = service(&store);

        let event = events
            .create(create(days_from_today(1), None))
            .await
            .unwrap();
        assert_eq!(event.description, "");

        let inbox = notifications.list_for_user(applicant.id).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::NewEvent);
        assert!(inbox[0].message.contains(&days_from_today(1)));
    }

    #[tokio::test]
    async fn listing_is_soonest_first() {
        let store = Arc::new(MemoryStore::new());
        let (events, _) = service(&store);
        events.create(create(days_from_today(9), None)).await.unwrap();
        events.create(create(days_from_today(2), None)).await.unwrap();

        let listed = events.list().await.unwrap();
        assert!(listed[0].date < listed[1].date);
    }

    #[tokio::test]
    async fn only_the_creator_may_change_an_owned_event() {
        let store = Arc::new(MemoryStore::new());
        let (events, _) = service(&store);
        let owner = Uuid::new_v4();
        let event = events
            .create(create(days_from_today(5), Some(owner)))
            .await
            .unwrap();

        let update = |user_id| UpdateEventPayload {
            title: Some("Renamed".into()),
            date: Some(days_from_today(6)),
            description: Some("Hall B".into()),
            user_id,
        };
        // required fields are checked before ownership
        let blank_title = UpdateEventPayload {
            title: Some("  ".into()),
            ..update(Some(Uuid::new_v4()))
        };
        assert!(matches!(
            events.update(event.id, blank_title).await,
            Err(Error::BadRequest(ref m)) if m == "Title and date are required"
        ));
        assert!(matches!(
            events.update(event.id, update(Some(Uuid::new_v4()))).await,
            Err(Error::Forbidden(_))
        ));
        let renamed = events.update(event.id, update(Some(owner))).await.unwrap();
        assert_eq!(renamed.title, "Renamed");

        assert!(matches!(
            events.delete(event.id, None).await,
            Err(Error::Forbidden(_))
        ));
        assert!(matches!(
            events.delete(event.id, Some(Uuid::new_v4())).await,
            Err(Error::Forbidden(_))
        ));
        events.delete(event.id, Some(owner)).await.unwrap();
        assert!(matches!(events.get(event.id).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn unowned_event_may_be_deleted_by_anyone() {
        let store = Arc::new(MemoryStore::new());
        let (events, _) = service(&store);
        let event = events
            .create(create(days_from_today(3), None))
            .await
            .unwrap();
        events.delete(event.id, Some(Uuid::new_v4())).await.unwrap();
        assert!(events.list().await.unwrap().is_empty());
    }
}
