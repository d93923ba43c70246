use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::error::{Error, Result};
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

const USER_COLUMNS: &str =
    "id, email, password_hash, role, banned, ban_reason, banned_at, created_at";
const APPLICANT_COLUMNS: &str =
    "id, user_id, first_name, last_name, phone, city, country, profile_picture";
const RECRUITER_COLUMNS: &str =
    "id, user_id, company_name, contact_name, phone, city, country, profile_picture";
const CV_COLUMNS: &str = "id, applicant_id, full_name, birth_date, marital_status, education_status, school_name, certificates, experience, cv_document, certificate_files, created_at, updated_at";
const JOB_COLUMNS: &str = "id, recruiter_id, title, description, location, job_type, deadline, is_active, created_at, updated_at";
const APPLICATION_COLUMNS: &str =
    "id, job_id, user_id, job_title, status, notes, applied_at, reviewed_at";
const NOTIFICATION_COLUMNS: &str =
    "id, user_id, kind, title, message, reason, job_title, admin_id, read, created_at";
const EVENT_COLUMNS: &str = "id, title, date, description, created_by, created_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let query = format!(
            "INSERT INTO users (id, email, password_hash, role) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match Error::from(e) {
                Error::Conflict(_) => Error::Conflict("User already exists".to_string()),
                other => other,
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>> {
        let query = format!(
            "SELECT {} FROM users ORDER BY created_at DESC",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn list_ids_by_role(&self, role: Role) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE role = $1")
            .bind(role)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<User>> {
        let query = format!(
            "UPDATE users SET role = $2 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_ban(&self, id: Uuid, ban: BanUpdate) -> Result<Option<User>> {
        let query = format!(
            "UPDATE users SET banned = $2, ban_reason = $3, banned_at = $4 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(ban.banned)
            .bind(ban.ban_reason)
            .bind(ban.banned_at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl ProfileRepository for PgStore {
    async fn find_applicant(&self, user_id: Uuid) -> Result<Option<Applicant>> {
        let query = format!(
            "SELECT {} FROM applicants WHERE user_id = $1",
            APPLICANT_COLUMNS
        );
        let applicant = sqlx::query_as::<_, Applicant>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(applicant)
    }

    async fn ensure_applicant(&self, user_id: Uuid) -> Result<Applicant> {
        // no-op update so RETURNING yields the existing row on conflict
        let query = format!(
            "INSERT INTO applicants (id, user_id) VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING {}",
            APPLICANT_COLUMNS
        );
        let applicant = sqlx::query_as::<_, Applicant>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(applicant)
    }

    async fn upsert_applicant(&self, user_id: Uuid, fields: ApplicantFields) -> Result<Applicant> {
        let query = format!(
            "INSERT INTO applicants (id, user_id, first_name, last_name, phone, city, country)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (user_id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                phone = EXCLUDED.phone,
                city = EXCLUDED.city,
                country = EXCLUDED.country
             RETURNING {}",
            APPLICANT_COLUMNS
        );
        let applicant = sqlx::query_as::<_, Applicant>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(fields.first_name)
            .bind(fields.last_name)
            .bind(fields.phone)
            .bind(fields.city)
            .bind(fields.country)
            .fetch_one(&self.pool)
            .await?;
        Ok(applicant)
    }

    async fn set_applicant_picture(
        &self,
        user_id: Uuid,
        picture: Option<String>,
    ) -> Result<Applicant> {
        let query = format!(
            "INSERT INTO applicants (id, user_id, profile_picture) VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO UPDATE SET profile_picture = EXCLUDED.profile_picture
             RETURNING {}",
            APPLICANT_COLUMNS
        );
        let applicant = sqlx::query_as::<_, Applicant>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(picture)
            .fetch_one(&self.pool)
            .await?;
        Ok(applicant)
    }

    async fn find_recruiter(&self, user_id: Uuid) -> Result<Option<Recruiter>> {
        let query = format!(
            "SELECT {} FROM recruiters WHERE user_id = $1",
            RECRUITER_COLUMNS
        );
        let recruiter = sqlx::query_as::<_, Recruiter>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(recruiter)
    }

    async fn upsert_recruiter(&self, user_id: Uuid, fields: RecruiterFields) -> Result<Recruiter> {
        let query = format!(
            "INSERT INTO recruiters (id, user_id, company_name, contact_name, phone, city, country)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (user_id) DO UPDATE SET
                company_name = EXCLUDED.company_name,
                contact_name = EXCLUDED.contact_name,
                phone = EXCLUDED.phone,
                city = EXCLUDED.city,
                country = EXCLUDED.country
             RETURNING {}",
            RECRUITER_COLUMNS
        );
        let recruiter = sqlx::query_as::<_, Recruiter>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(fields.company_name)
            .bind(fields.contact_name)
            .bind(fields.phone)
            .bind(fields.city)
            .bind(fields.country)
            .fetch_one(&self.pool)
            .await?;
        Ok(recruiter)
    }

    async fn set_recruiter_picture(
        &self,
        user_id: Uuid,
        picture: Option<String>,
    ) -> Result<Recruiter> {
        let query = format!(
            "INSERT INTO recruiters (id, user_id, profile_picture) VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO UPDATE SET profile_picture = EXCLUDED.profile_picture
             RETURNING {}",
            RECRUITER_COLUMNS
        );
        let recruiter = sqlx::query_as::<_, Recruiter>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(picture)
            .fetch_one(&self.pool)
            .await?;
        Ok(recruiter)
    }
}

#[async_trait]
impl CvRepository for PgStore {
    async fn find_by_applicant(&self, applicant_id: Uuid) -> Result<Option<Cv>> {
        let query = format!("SELECT {} FROM cvs WHERE applicant_id = $1", CV_COLUMNS);
        let cv = sqlx::query_as::<_, Cv>(&query)
            .bind(applicant_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cv)
    }

    async fn upsert(&self, applicant_id: Uuid, fields: CvFields) -> Result<Cv> {
        let query = format!(
            "INSERT INTO cvs (
                id, applicant_id, full_name, birth_date, marital_status, education_status,
                school_name, certificates, experience, cv_document, certificate_files
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             ON CONFLICT (applicant_id) DO UPDATE SET
                full_name = EXCLUDED.full_name,
                birth_date = EXCLUDED.birth_date,
                marital_status = EXCLUDED.marital_status,
                education_status = EXCLUDED.education_status,
                school_name = EXCLUDED.school_name,
                certificates = EXCLUDED.certificates,
                experience = EXCLUDED.experience,
                cv_document = EXCLUDED.cv_document,
                certificate_files = EXCLUDED.certificate_files,
                updated_at = NOW()
             RETURNING {}",
            CV_COLUMNS
        );
        let cv = sqlx::query_as::<_, Cv>(&query)
            .bind(Uuid::new_v4())
            .bind(applicant_id)
            .bind(fields.full_name)
            .bind(fields.birth_date)
            .bind(fields.marital_status)
            .bind(fields.education_status)
            .bind(fields.school_name)
            .bind(fields.certificates)
            .bind(Json(fields.experience))
            .bind(fields.cv_document)
            .bind(fields.certificate_files)
            .fetch_one(&self.pool)
            .await?;
        Ok(cv)
    }

    async fn delete_by_applicant(&self, applicant_id: Uuid) -> Result<Option<Cv>> {
        let query = format!(
            "DELETE FROM cvs WHERE applicant_id = $1 RETURNING {}",
            CV_COLUMNS
        );
        let cv = sqlx::query_as::<_, Cv>(&query)
            .bind(applicant_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cv)
    }

    async fn list_with_applicants(&self) -> Result<Vec<CvWithApplicant>> {
        let cvs = sqlx::query_as::<_, CvWithApplicant>(
            r#"
            SELECT c.id, c.applicant_id, c.full_name, c.birth_date, c.marital_status,
                   c.education_status, c.school_name, c.certificates, c.experience,
                   c.cv_document, c.certificate_files, c.created_at, c.updated_at,
                   a.user_id, a.first_name, a.last_name
            FROM cvs c
            JOIN applicants a ON a.id = c.applicant_id
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(cvs)
    }
}

#[async_trait]
impl JobRepository for PgStore {
    async fn create(&self, recruiter_id: Uuid, fields: JobFields) -> Result<Job> {
        let query = format!(
            "INSERT INTO jobs (id, recruiter_id, title, description, location, job_type, deadline, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
             RETURNING {}",
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&query)
            .bind(Uuid::new_v4())
            .bind(recruiter_id)
            .bind(fields.title)
            .bind(fields.description)
            .bind(fields.location)
            .bind(fields.job_type)
            .bind(fields.deadline)
            .fetch_one(&self.pool)
            .await?;
        Ok(job)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>> {
        let query = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        let job = sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn list(&self) -> Result<Vec<Job>> {
        let query = format!("SELECT {} FROM jobs ORDER BY created_at DESC", JOB_COLUMNS);
        let jobs = sqlx::query_as::<_, Job>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    async fn list_by_recruiter(&self, recruiter_id: Uuid) -> Result<Vec<Job>> {
        let query = format!(
            "SELECT {} FROM jobs WHERE recruiter_id = $1 ORDER BY created_at DESC",
            JOB_COLUMNS
        );
        let jobs = sqlx::query_as::<_, Job>(&query)
            .bind(recruiter_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    async fn update(&self, id: Uuid, fields: JobFields) -> Result<Option<Job>> {
        let query = format!(
            "UPDATE jobs SET
                title = $2,
                description = $3,
                location = $4,
                job_type = $5,
                deadline = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(fields.title)
            .bind(fields.description)
            .bind(fields.location)
            .bind(fields.job_type)
            .bind(fields.deadline)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Job>> {
        let query = format!("DELETE FROM jobs WHERE id = $1 RETURNING {}", JOB_COLUMNS);
        let job = sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }
}

#[async_trait]
impl ApplicationRepository for PgStore {
    async fn create(&self, application: NewApplication) -> Result<Application> {
        let query = format!(
            "INSERT INTO applications (id, job_id, user_id, job_title, status)
             VALUES ($1, $2, $3, $4, 'pending')
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(Uuid::new_v4())
            .bind(application.job_id)
            .bind(application.user_id)
            .bind(&application.job_title)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match Error::from(e) {
                Error::Conflict(_) => {
                    Error::Conflict("You have already applied to this job".to_string())
                }
                other => other,
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE id = $1",
            APPLICATION_COLUMNS
        );
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(application)
    }

    async fn list(&self) -> Result<Vec<Application>> {
        let query = format!(
            "SELECT {} FROM applications ORDER BY applied_at DESC",
            APPLICATION_COLUMNS
        );
        let applications = sqlx::query_as::<_, Application>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(applications)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE user_id = $1 ORDER BY applied_at DESC",
            APPLICATION_COLUMNS
        );
        let applications = sqlx::query_as::<_, Application>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(applications)
    }

    async fn list_by_job(&self, job_id: Uuid) -> Result<Vec<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE job_id = $1 ORDER BY applied_at DESC",
            APPLICATION_COLUMNS
        );
        let applications = sqlx::query_as::<_, Application>(&query)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(applications)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        notes: Option<String>,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Option<StatusTransition>> {
        let mut tx = self.pool.begin().await?;

        let previous = sqlx::query_scalar::<_, ApplicationStatus>(
            "SELECT status FROM applications WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(previous) = previous else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE applications SET
                status = $2,
                notes = COALESCE($3, notes),
                reviewed_at = $4
             WHERE id = $1
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(status)
            .bind(notes)
            .bind(reviewed_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(StatusTransition {
            application,
            previous,
        }))
    }
}

#[async_trait]
impl NotificationRepository for PgStore {
    async fn create(&self, user_id: Uuid, draft: &NotificationDraft) -> Result<Notification> {
        let query = format!(
            "INSERT INTO notifications (id, user_id, kind, title, message, reason, job_title, admin_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            NOTIFICATION_COLUMNS
        );
        let notification = sqlx::query_as::<_, Notification>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(draft.kind)
            .bind(&draft.title)
            .bind(&draft.message)
            .bind(&draft.reason)
            .bind(&draft.job_title)
            .bind(draft.admin_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(notification)
    }

    async fn create_many(&self, user_ids: &[Uuid], draft: &NotificationDraft) -> Result<u64> {
        if user_ids.is_empty() {
            return Ok(0);
        }
        let ids: Vec<Uuid> = user_ids.iter().map(|_| Uuid::new_v4()).collect();
        let res = sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, message, reason, job_title, admin_id)
            SELECT recipients.id, recipients.user_id, $3, $4, $5, $6, $7, $8
            FROM UNNEST($1::uuid[], $2::uuid[]) AS recipients(id, user_id)
            "#,
        )
        .bind(ids)
        .bind(user_ids.to_vec())
        .bind(draft.kind)
        .bind(&draft.title)
        .bind(&draft.message)
        .bind(&draft.reason)
        .bind(&draft.job_title)
        .bind(draft.admin_id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let query = format!(
            "SELECT {} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
            NOTIFICATION_COLUMNS
        );
        let notifications = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(notifications)
    }

    async fn mark_read(&self, id: Uuid) -> Result<Option<Notification>> {
        let query = format!(
            "UPDATE notifications SET read = TRUE WHERE id = $1 RETURNING {}",
            NOTIFICATION_COLUMNS
        );
        let notification = sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(notification)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let res =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE")
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(res.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl EventRepository for PgStore {
    async fn create(&self, fields: EventFields, created_by: Option<Uuid>) -> Result<Event> {
        let query = format!(
            "INSERT INTO events (id, title, date, description, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(Uuid::new_v4())
            .bind(fields.title)
            .bind(fields.date)
            .bind(fields.description)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await?;
        Ok(event)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let query = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn list(&self) -> Result<Vec<Event>> {
        let query = format!(
            "SELECT {} FROM events ORDER BY date ASC, created_at ASC",
            EVENT_COLUMNS
        );
        let events = sqlx::query_as::<_, Event>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn update(&self, id: Uuid, fields: EventFields) -> Result<Option<Event>> {
        let query = format!(
            "UPDATE events SET title = $2, date = $3, description = $4 WHERE id = $1 RETURNING {}",
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(fields.title)
            .bind(fields.date)
            .bind(fields.description)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

// Run against a live server with `DATABASE_URL=... cargo test -- --ignored`.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UNKNOWN_USER;

    async fn user(store: &PgStore, email: &str, role: Role) -> User {
        UserRepository::create(
            store,
            NewUser {
                email: email.into(),
                password_hash: "h".into(),
                role,
            },
        )
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn unique_indexes_surface_as_conflicts(pool: PgPool) {
        let store = PgStore::new(pool);
        let applicant = user(&store, "a@x.com", Role::Applicant).await;

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

        let new_application = || NewApplication {
            job_id: Uuid::new_v4(),
            user_id: applicant.id,
            job_title: "QA".into(),
        };
        let first = new_application();
        let job_id = first.job_id;
        ApplicationRepository::create(&store, first).await.unwrap();
        let err = ApplicationRepository::create(
            &store,
            NewApplication {
                job_id,
                ..new_application()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn status_update_reports_previous_status(pool: PgPool) {
        let store = PgStore::new(pool);
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

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn fan_out_writes_one_row_per_recipient(pool: PgPool) {
        let store = PgStore::new(pool);
        let recipients = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let draft = NotificationDraft::new_job("Backend Engineer", "Berlin");

        assert_eq!(store.create_many(&recipients, &draft).await.unwrap(), 3);
        for id in &recipients {
            let inbox = store.list_for_user(*id).await.unwrap();
            assert_eq!(inbox.len(), 1);
            assert!(!inbox[0].read);
        }
        assert_eq!(store.create_many(&[], &draft).await.unwrap(), 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn profiles_for_unknown_users_are_not_found(pool: PgPool) {
        let store = PgStore::new(pool);
        let err = store.ensure_applicant(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == UNKNOWN_USER));

        let owner = user(&store, "r@x.com", Role::Recruiter).await;
        let first = store.ensure_applicant(owner.id).await.unwrap();
        let second = store.ensure_applicant(owner.id).await.unwrap();
        assert_eq!(first.id, second.id);
    }
}
