//! In-process store behind the repository traits.
//!
//! Every operation takes the single state lock, so check-then-write sequences
//! (email uniqueness, one application per job and user) are atomic exactly as
//! the unique indexes make them in Postgres.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{Error, Result, UNKNOWN_USER};
use crate::models::{
    application::{Application, ApplicationStatus, NewApplication, StatusTransition},
    cv::{Cv, CvFields, CvWithApplicant},
    event::{Event, EventFields},
    job::{Job, JobFields},
    notification::{Notification, NotificationDraft},
    profile::{Applicant, ApplicantFields, Recruiter, RecruiterFields},
    user::{BanUpdate, NewUser, Role, User},
};
use crate::repository::{
    ApplicationRepository, CvRepository, EventRepository, JobRepository, NotificationRepository,
    ProfileRepository, UserRepository,
};

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    applicants: Vec<Applicant>,
    recruiters: Vec<Recruiter>,
    cvs: Vec<Cv>,
    jobs: Vec<Job>,
    applications: Vec<Application>,
    notifications: Vec<Notification>,
    events: Vec<Event>,
}

impl MemoryState {
    /// Profile rows hang off a user, like the foreign key in Postgres.
    fn require_user(&self, user_id: Uuid) -> Result<()> {
        if self.users.iter().any(|u| u.id == user_id) {
            Ok(())
        } else {
            Err(Error::NotFound(UNKNOWN_USER.to_string()))
        }
    }

    fn ensure_applicant(&mut self, user_id: Uuid) -> Result<&mut Applicant> {
        self.require_user(user_id)?;
        let index = match self.applicants.iter().position(|a| a.user_id == user_id) {
            Some(index) => index,
            None => {
                self.applicants.push(Applicant {
                    id: Uuid::new_v4(),
                    user_id,
                    first_name: None,
                    last_name: None,
                    phone: None,
                    city: None,
                    country: None,
                    profile_picture: None,
                });
                self.applicants.len() - 1
            }
        };
        Ok(&mut self.applicants[index])
    }

    fn ensure_recruiter(&mut self, user_id: Uuid) -> Result<&mut Recruiter> {
        self.require_user(user_id)?;
        let index = match self.recruiters.iter().position(|r| r.user_id == user_id) {
            Some(index) => index,
            None => {
                self.recruiters.push(Recruiter {
                    id: Uuid::new_v4(),
                    user_id,
                    company_name: None,
                    contact_name: None,
                    phone: None,
                    city: None,
                    country: None,
                    profile_picture: None,
                });
                self.recruiters.len() - 1
            }
        };
        Ok(&mut self.recruiters[index])
    }

    fn stamp_notification(user_id: Uuid, draft: &NotificationDraft) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id,
            kind: draft.kind,
            title: draft.title.clone(),
            message: draft.message.clone(),
            reason: draft.reason.clone(),
            job_title: draft.job_title.clone(),
            admin_id: draft.admin_id,
            read: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let mut state = self.state.lock().await;
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(Error::Conflict("User already exists".to_string()));
        }
        let record = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            banned: false,
            ban_reason: None,
            banned_at: None,
            created_at: Utc::now(),
        };
        state.users.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().rev().cloned().collect())
    }

    async fn list_ids_by_role(&self, role: Role) -> Result<Vec<Uuid>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .filter(|u| u.role == role)
            .map(|u| u.id)
            .collect())
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<User>> {
        let mut state = self.state.lock().await;
        Ok(state.users.iter_mut().find(|u| u.id == id).map(|user| {
            user.role = role;
            user.clone()
        }))
    }

    async fn update_ban(&self, id: Uuid, ban: BanUpdate) -> Result<Option<User>> {
        let mut state = self.state.lock().await;
        Ok(state.users.iter_mut().find(|u| u.id == id).map(|user| {
            user.banned = ban.banned;
            user.ban_reason = ban.ban_reason;
            user.banned_at = ban.banned_at;
            user.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().await;
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Ok(false);
        }
        let applicant_ids: Vec<Uuid> = state
            .applicants
            .iter()
            .filter(|a| a.user_id == id)
            .map(|a| a.id)
            .collect();
        state.cvs.retain(|cv| !applicant_ids.contains(&cv.applicant_id));
        state.applicants.retain(|a| a.user_id != id);
        state.recruiters.retain(|r| r.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find_applicant(&self, user_id: Uuid) -> Result<Option<Applicant>> {
        let state = self.state.lock().await;
        Ok(state.applicants.iter().find(|a| a.user_id == user_id).cloned())
    }

    async fn ensure_applicant(&self, user_id: Uuid) -> Result<Applicant> {
        let mut state = self.state.lock().await;
        Ok(state.ensure_applicant(user_id)?.clone())
    }

    async fn upsert_applicant(&self, user_id: Uuid, fields: ApplicantFields) -> Result<Applicant> {
        let mut state = self.state.lock().await;
        let applicant = state.ensure_applicant(user_id)?;
        applicant.first_name = fields.first_name;
        applicant.last_name = fields.last_name;
        applicant.phone = fields.phone;
        applicant.city = fields.city;
        applicant.country = fields.country;
        Ok(applicant.clone())
    }

    async fn set_applicant_picture(
        &self,
        user_id: Uuid,
        picture: Option<String>,
    ) -> Result<Applicant> {
        let mut state = self.state.lock().await;
        let applicant = state.ensure_applicant(user_id)?;
        applicant.profile_picture = picture;
        Ok(applicant.clone())
    }

    async fn find_recruiter(&self, user_id: Uuid) -> Result<Option<Recruiter>> {
        let state = self.state.lock().await;
        Ok(state.recruiters.iter().find(|r| r.user_id == user_id).cloned())
    }

    async fn upsert_recruiter(&self, user_id: Uuid, fields: RecruiterFields) -> Result<Recruiter> {
        let mut state = self.state.lock().await;
        let recruiter = state.ensure_recruiter(user_id)?;
        recruiter.company_name = fields.company_name;
        recruiter.contact_name = fields.contact_name;
        recruiter.phone = fields.phone;
        recruiter.city = fields.city;
        recruiter.country = fields.country;
        Ok(recruiter.clone())
    }

    async fn set_recruiter_picture(
        &self,
        user_id: Uuid,
        picture: Option<String>,
    ) -> Result<Recruiter> {
        let mut state = self.state.lock().await;
        let recruiter = state.ensure_recruiter(user_id)?;
        recruiter.profile_picture = picture;
        Ok(recruiter.clone())
    }
}

#[async_trait]
impl CvRepository for MemoryStore {
    async fn find_by_applicant(&self, applicant_id: Uuid) -> Result<Option<Cv>> {
        let state = self.state.lock().await;
        Ok(state
            .cvs
            .iter()
            .find(|cv| cv.applicant_id == applicant_id)
            .cloned())
    }

    async fn upsert(&self, applicant_id: Uuid, fields: CvFields) -> Result<Cv> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        if let Some(cv) = state
            .cvs
            .iter_mut()
            .find(|cv| cv.applicant_id == applicant_id)
        {
            cv.full_name = fields.full_name;
            cv.birth_date = fields.birth_date;
            cv.marital_status = fields.marital_status;
            cv.education_status = fields.education_status;
            cv.school_name = fields.school_name;
            cv.certificates = fields.certificates;
            cv.experience = Json(fields.experience);
            cv.cv_document = fields.cv_document;
            cv.certificate_files = fields.certificate_files;
            cv.updated_at = now;
            return Ok(cv.clone());
        }

        let cv = Cv {
            id: Uuid::new_v4(),
            applicant_id,
            full_name: fields.full_name,
            birth_date: fields.birth_date,
            marital_status: fields.marital_status,
            education_status: fields.education_status,
            school_name: fields.school_name,
            certificates: fields.certificates,
            experience: Json(fields.experience),
            cv_document: fields.cv_document,
            certificate_files: fields.certificate_files,
            created_at: now,
            updated_at: now,
        };
        state.cvs.push(cv.clone());
        Ok(cv)
    }

    async fn delete_by_applicant(&self, applicant_id: Uuid) -> Result<Option<Cv>> {
        let mut state = self.state.lock().await;
        let Some(index) = state
            .cvs
            .iter()
            .position(|cv| cv.applicant_id == applicant_id)
        else {
            return Ok(None);
        };
        Ok(Some(state.cvs.remove(index)))
    }

    async fn list_with_applicants(&self) -> Result<Vec<CvWithApplicant>> {
        let state = self.state.lock().await;
        Ok(state
            .cvs
            .iter()
            .rev()
            .filter_map(|cv| {
                let applicant = state.applicants.iter().find(|a| a.id == cv.applicant_id)?;
                Some(CvWithApplicant {
                    cv: cv.clone(),
                    user_id: applicant.user_id,
                    first_name: applicant.first_name.clone(),
                    last_name: applicant.last_name.clone(),
                })
            })
            .collect())
    }
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn create(&self, recruiter_id: Uuid, fields: JobFields) -> Result<Job> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4(),
            recruiter_id,
            title: fields.title,
            description: fields.description,
            location: fields.location,
            job_type: fields.job_type,
            deadline: fields.deadline,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        state.jobs.push(job.clone());
        Ok(job)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>> {
        let state = self.state.lock().await;
        Ok(state.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Job>> {
        let state = self.state.lock().await;
        Ok(state.jobs.iter().rev().cloned().collect())
    }

    async fn list_by_recruiter(&self, recruiter_id: Uuid) -> Result<Vec<Job>> {
        let state = self.state.lock().await;
        Ok(state
            .jobs
            .iter()
            .rev()
            .filter(|j| j.recruiter_id == recruiter_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, fields: JobFields) -> Result<Option<Job>> {
        let mut state = self.state.lock().await;
        Ok(state.jobs.iter_mut().find(|j| j.id == id).map(|job| {
            job.title = fields.title;
            job.description = fields.description;
            job.location = fields.location;
            job.job_type = fields.job_type;
            job.deadline = fields.deadline;
            job.updated_at = Utc::now();
            job.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Job>> {
        let mut state = self.state.lock().await;
        let Some(index) = state.jobs.iter().position(|j| j.id == id) else {
            return Ok(None);
        };
        Ok(Some(state.jobs.remove(index)))
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn create(&self, application: NewApplication) -> Result<Application> {
        let mut state = self.state.lock().await;
        let duplicate = state
            .applications
            .iter()
            .any(|a| a.job_id == application.job_id && a.user_id == application.user_id);
        if duplicate {
            return Err(Error::Conflict(
                "You have already applied to this job".to_string(),
            ));
        }
        let record = Application {
            id: Uuid::new_v4(),
            job_id: application.job_id,
            user_id: application.user_id,
            job_title: application.job_title,
            status: ApplicationStatus::Pending,
            notes: None,
            applied_at: Utc::now(),
            reviewed_at: None,
        };
        state.applications.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>> {
        let state = self.state.lock().await;
        Ok(state.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Application>> {
        let state = self.state.lock().await;
        Ok(state.applications.iter().rev().cloned().collect())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Application>> {
        let state = self.state.lock().await;
        Ok(state
            .applications
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_job(&self, job_id: Uuid) -> Result<Vec<Application>> {
        let state = self.state.lock().await;
        Ok(state
            .applications
            .iter()
            .rev()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        notes: Option<String>,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Option<StatusTransition>> {
        let mut state = self.state.lock().await;
        Ok(state
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .map(|application| {
                let previous = application.status;
                application.status = status;
                if notes.is_some() {
                    application.notes = notes;
                }
                application.reviewed_at = Some(reviewed_at);
                StatusTransition {
                    application: application.clone(),
                    previous,
                }
            }))
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn create(&self, user_id: Uuid, draft: &NotificationDraft) -> Result<Notification> {
        let mut state = self.state.lock().await;
        let notification = MemoryState::stamp_notification(user_id, draft);
        state.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn create_many(&self, user_ids: &[Uuid], draft: &NotificationDraft) -> Result<u64> {
        let mut state = self.state.lock().await;
        for user_id in user_ids {
            let notification = MemoryState::stamp_notification(*user_id, draft);
            state.notifications.push(notification);
        }
        Ok(user_ids.len() as u64)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let state = self.state.lock().await;
        Ok(state
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: Uuid) -> Result<Option<Notification>> {
        let mut state = self.state.lock().await;
        Ok(state
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .map(|notification| {
                notification.read = true;
                notification.clone()
            }))
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let mut state = self.state.lock().await;
        let mut updated = 0;
        for notification in state
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.read)
        {
            notification.read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().await;
        let before = state.notifications.len();
        state.notifications.retain(|n| n.id != id);
        Ok(state.notifications.len() != before)
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn create(&self, fields: EventFields, created_by: Option<Uuid>) -> Result<Event> {
        let mut state = self.state.lock().await;
        let event = Event {
            id: Uuid::new_v4(),
            title: fields.title,
            date: fields.date,
            description: fields.description,
            created_by,
            created_at: Utc::now(),
        };
        state.events.push(event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let state = self.state.lock().await;
        Ok(state.events.iter().find(|e| e.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Event>> {
        let state = self.state.lock().await;
        let mut events = state.events.clone();
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    async fn update(&self, id: Uuid, fields: EventFields) -> Result<Option<Event>> {
        let mut state = self.state.lock().await;
        Ok(state.events.iter_mut().find(|e| e.id == id).map(|event| {
            event.title = fields.title;
            event.date = fields.date;
            event.description = fields.description;
            event.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().await;
        let before = state.events.len();
        state.events.retain(|e| e.id != id);
        Ok(state.events.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::Experience;

    async fn user(store: &MemoryStore, email: &str) -> User {
        UserRepository::create(
            store,
            NewUser {
                email: email.into(),
                password_hash: "h".into(),
                role: Role::Applicant,
            },
        )
        .await
        .unwrap()
    }

    fn cv_fields(name: &str) -> CvFields {
        CvFields {
            full_name: name.into(),
            birth_date: "2000-01-01".into(),
            marital_status: "single".into(),
            education_status: "student".into(),
            school_name: "MIT".into(),
            certificates: String::new(),
            experience: vec![Experience::default()],
            cv_document: None,
            certificate_files: vec![],
        }
    }

    #[tokio::test]
    async fn emails_are_unique() {
        let store = MemoryStore::new();
        user(&store, "a@x.com").await;
        let err = UserRepository::create(
            &store,
            NewUser {
                email: "a@x.com".into(),
                password_hash: "h".into(),
                role: Role::Recruiter,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_to_profiles_and_cv() {
        let store = MemoryStore::new();
        let gone = user(&store, "gone@x.com").await;
        let kept = user(&store, "kept@x.com").await;

        for u in [&gone, &kept] {
            let applicant = store.ensure_applicant(u.id).await.unwrap();
            CvRepository::upsert(&store, applicant.id, cv_fields(&u.email))
                .await
                .unwrap();
        }
        store
            .upsert_recruiter(gone.id, RecruiterFields::default())
            .await
            .unwrap();

        assert!(UserRepository::delete(&store, gone.id).await.unwrap());
        assert!(!UserRepository::delete(&store, gone.id).await.unwrap());

        assert!(store.find_applicant(gone.id).await.unwrap().is_none());
        assert!(store.find_recruiter(gone.id).await.unwrap().is_none());
        let remaining = store.list_with_applicants().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user_id, kept.id);
    }

    #[tokio::test]
    async fn cv_upsert_rewrites_in_place() {
        let store = MemoryStore::new();
        let owner = user(&store, "cv@x.com").await;
        let applicant = store.ensure_applicant(owner.id).await.unwrap();

        let first = CvRepository::upsert(&store, applicant.id, cv_fields("First"))
            .await
            .unwrap();
        let second = CvRepository::upsert(&store, applicant.id, cv_fields("Second"))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.full_name, "Second");
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(store.list_with_applicants().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn status_update_reports_previous_status() {
        let store = MemoryStore::new();
        let created = ApplicationRepository::create(
            &store,
            NewApplication {
                job_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                job_title: "QA".into(),
            },
        )
        .await
        .unwrap();

        let first = store
            .update_status(created.id, ApplicationStatus::Accepted, Some("ok".into()), Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.previous, ApplicationStatus::Pending);
        assert!(first.changed());

        let again = store
            .update_status(created.id, ApplicationStatus::Accepted, None, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert!(!again.changed());
        assert_eq!(again.application.notes.as_deref(), Some("ok"));

        assert!(store
            .update_status(Uuid::new_v4(), ApplicationStatus::Rejected, None, Utc::now())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn profiles_require_an_existing_user() {
        let store = MemoryStore::new();
        let err = store.ensure_applicant(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == UNKNOWN_USER));
        assert!(store
            .upsert_recruiter(Uuid::new_v4(), RecruiterFields::default())
            .await
            .is_err());
        assert!(store.list_with_applicants().await.unwrap().is_empty());
    }
}
