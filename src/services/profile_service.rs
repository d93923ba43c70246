use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::profile::{Applicant, ApplicantFields, ProfileKind, Recruiter, RecruiterFields};
use crate::repository::ProfileRepository;
use crate::services::upload_service::{UploadKind, UploadStore, UploadedFile};

#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
    uploads: UploadStore,
}

fn not_found(kind: ProfileKind) -> Error {
    Error::NotFound(format!("{} not found", kind.label()))
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileRepository>, uploads: UploadStore) -> Self {
        Self { profiles, uploads }
    }

    pub async fn get_applicant(&self, user_id: Uuid) -> Result<Applicant> {
        self.profiles
            .find_applicant(user_id)
            .await?
            .ok_or_else(|| not_found(ProfileKind::Applicant))
    }

    pub async fn upsert_applicant(
        &self,
        user_id: Uuid,
        fields: ApplicantFields,
    ) -> Result<Applicant> {
        self.profiles.upsert_applicant(user_id, fields).await
    }

    /// Stores a new picture and drops the one it replaces.
    pub async fn set_applicant_picture(
        &self,
        user_id: Uuid,
        file: &UploadedFile,
    ) -> Result<Applicant> {
        let previous = self
            .profiles
            .find_applicant(user_id)
            .await?
            .and_then(|a| a.profile_picture);
        let path = self
            .uploads
            .save(UploadKind::ProfilePicture, user_id, None, file)
            .await?;

        let stored = self
            .profiles
            .set_applicant_picture(user_id, Some(path.clone()))
            .await;
        let applicant = match stored {
            Ok(applicant) => applicant,
            Err(e) => {
                self.uploads.remove(&path).await;
                return Err(e);
            }
        };
        if let Some(previous) = previous.filter(|p| *p != path) {
            self.uploads.remove(&previous).await;
        }
        Ok(applicant)
    }

    pub async fn remove_applicant_picture(&self, user_id: Uuid) -> Result<Applicant> {
        let current = self.get_applicant(user_id).await?;
        let applicant = self.profiles.set_applicant_picture(user_id, None).await?;
        if let Some(previous) = current.profile_picture {
            self.uploads.remove(&previous).await;
        }
        Ok(applicant)
    }

    pub async fn get_recruiter(&self, user_id: Uuid) -> Result<Recruiter> {
        self.profiles
            .find_recruiter(user_id)
            .await?
            .ok_or_else(|| not_found(ProfileKind::Recruiter))
    }

    pub async fn upsert_recruiter(
        &self,
        user_id: Uuid,
        fields: RecruiterFields,
    ) -> Result<Recruiter> {
        self.profiles.upsert_recruiter(user_id, fields).await
    }

    pub async fn set_recruiter_picture(
        &self,
        user_id: Uuid,
        file: &UploadedFile,
    ) -> Result<Recruiter> {
        let previous = self
            .profiles
            .find_recruiter(user_id)
            .await?
            .and_then(|r| r.profile_picture);
        let path = self
            .uploads
            .save(UploadKind::ProfilePicture, user_id, None, file)
            .await?;

        let stored = self
            .profiles
            .set_recruiter_picture(user_id, Some(path.clone()))
            .await;
        let recruiter = match stored {
            Ok(recruiter) => recruiter,
            Err(e) => {
                self.uploads.remove(&path).await;
                return Err(e);
            }
        };
        if let Some(previous) = previous.filter(|p| *p != path) {
            self.uploads.remove(&previous).await;
        }
        Ok(recruiter)
    }

    pub async fn remove_recruiter_picture(&self, user_id: Uuid) -> Result<Recruiter> {
        let current = self.get_recruiter(user_id).await?;
        let recruiter = self.profiles.set_recruiter_picture(user_id, None).await?;
        if let Some(previous) = current.profile_picture {
            self.uploads.remove(&previous).await;
        }
        Ok(recruiter)
    }
}
