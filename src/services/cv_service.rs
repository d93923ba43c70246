use std::sync::Arc;

use uuid::Uuid;

use crate::dto::cv_dto::{CvSubmission, MAX_CERTIFICATE_FILES};
use crate::error::{Error, Result};
use crate::models::cv::{Cv, CvFields, CvWithApplicant};
use crate::repository::{CvRepository, ProfileRepository};
use crate::services::upload_service::{UploadKind, UploadStore};
use crate::utils::validation::{non_blank, require_all};

/// Outcome of a submission: the stored CV and whether it was newly created.
#[derive(Debug, Clone)]
pub struct CvSubmitted {
    pub cv: Cv,
    pub created: bool,
}

#[derive(Clone)]
pub struct CvService {
    profiles: Arc<dyn ProfileRepository>,
    cvs: Arc<dyn CvRepository>,
    uploads: UploadStore,
}

impl CvService {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        cvs: Arc<dyn CvRepository>,
        uploads: UploadStore,
    ) -> Self {
        Self {
            profiles,
            cvs,
            uploads,
        }
    }

    /// Creates the applicant's CV or rewrites it in place. Files left out of
    /// a resubmission keep their previous versions; replaced files are
    /// removed from the upload store.
    pub async fn submit(&self, submission: CvSubmission) -> Result<CvSubmitted> {
        let user_id = non_blank(submission.user_id.as_deref()).ok_or_else(|| {
            Error::BadRequest("User ID is required. Please login first.".to_string())
        })?;
        let user_id = Uuid::parse_str(user_id)
            .map_err(|_| Error::BadRequest("Invalid user ID".to_string()))?;

        require_all(
            &[
                submission.full_name.as_deref(),
                submission.birth_date.as_deref(),
                submission.marital_status.as_deref(),
                submission.education_status.as_deref(),
                submission.school_name.as_deref(),
            ],
            "All required fields must be filled",
        )?;
        if submission.certificate_files.len() > MAX_CERTIFICATE_FILES {
            return Err(Error::BadRequest(format!(
                "At most {} certificate files are allowed",
                MAX_CERTIFICATE_FILES
            )));
        }

        // a rejected file must not leave an applicant row behind
        let (new_document, new_certificates) = self.store_files(user_id, &submission).await?;
        let written: Vec<String> = new_document
            .iter()
            .chain(new_certificates.iter())
            .cloned()
            .collect();

        let lookup = async {
            let applicant = self.profiles.ensure_applicant(user_id).await?;
            let existing = self.cvs.find_by_applicant(applicant.id).await?;
            Ok::<_, Error>((applicant, existing))
        };
        let (applicant, existing) = match lookup.await {
            Ok(found) => found,
            Err(e) => {
                self.uploads.remove_all(&written).await;
                return Err(e);
            }
        };

        let previous_document = existing.as_ref().and_then(|cv| cv.cv_document.clone());
        let previous_certificates = existing
            .as_ref()
            .map(|cv| cv.certificate_files.clone())
            .unwrap_or_default();

        let fields = CvFields {
            full_name: text(&submission.full_name),
            birth_date: text(&submission.birth_date),
            marital_status: text(&submission.marital_status),
            education_status: text(&submission.education_status),
            school_name: text(&submission.school_name),
            certificates: submission.certificates.clone().unwrap_or_default(),
            experience: submission.parsed_experience(),
            cv_document: new_document.clone().or_else(|| previous_document.clone()),
            certificate_files: if new_certificates.is_empty() {
                previous_certificates.clone()
            } else {
                new_certificates.clone()
            },
        };

        let cv = match self.cvs.upsert(applicant.id, fields).await {
            Ok(cv) => cv,
            Err(e) => {
                self.uploads.remove_all(&written).await;
                return Err(e);
            }
        };

        let mut superseded: Vec<String> = Vec::new();
        if new_document.is_some() && previous_document != new_document {
            superseded.extend(previous_document);
        }
        if !new_certificates.is_empty() {
            superseded.extend(
                previous_certificates
                    .into_iter()
                    .filter(|path| !new_certificates.contains(path)),
            );
        }
        self.uploads.remove_all(&superseded).await;

        let created = existing.is_none();
        tracing::info!(user_id = %user_id, cv_id = %cv.id, created, "cv stored");
        Ok(CvSubmitted { cv, created })
    }

    /// The user's CV together with the applicant it belongs to, if any.
    pub async fn get_by_user(&self, user_id: Uuid) -> Result<Option<CvWithApplicant>> {
        let Some(applicant) = self.profiles.find_applicant(user_id).await? else {
            return Ok(None);
        };
        let cv = self.cvs.find_by_applicant(applicant.id).await?;
        Ok(cv.map(|cv| CvWithApplicant {
            cv,
            user_id,
            first_name: applicant.first_name,
            last_name: applicant.last_name,
        }))
    }

    pub async fn has_cv(&self, user_id: Uuid) -> Result<bool> {
        Ok(self.get_by_user(user_id).await?.is_some())
    }

    pub async fn delete(&self, user_id: Uuid) -> Result<Cv> {
        let applicant = self
            .profiles
            .find_applicant(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("Applicant not found".to_string()))?;
        let cv = self
            .cvs
            .delete_by_applicant(applicant.id)
            .await?
            .ok_or_else(|| Error::NotFound("CV not found".to_string()))?;

        let files: Vec<String> = cv
            .cv_document
            .iter()
            .chain(cv.certificate_files.iter())
            .cloned()
            .collect();
        self.uploads.remove_all(&files).await;
        tracing::info!(user_id = %user_id, cv_id = %cv.id, "cv deleted");
        Ok(cv)
    }

    /// Writes every uploaded file; on failure the ones already written are
    /// removed again.
    async fn store_files(
        &self,
        user_id: Uuid,
        submission: &CvSubmission,
    ) -> Result<(Option<String>, Vec<String>)> {
        let mut written: Vec<String> = Vec::new();

        let document = match &submission.cv_document {
            Some(file) => {
                let path = self
                    .uploads
                    .save(UploadKind::CvFile, user_id, None, file)
                    .await?;
                written.push(path.clone());
                Some(path)
            }
            None => None,
        };

        let mut certificates = Vec::with_capacity(submission.certificate_files.len());
        for (index, file) in submission.certificate_files.iter().enumerate() {
            match self
                .uploads
                .save(UploadKind::CvFile, user_id, Some(index + 1), file)
                .await
            {
                Ok(path) => {
                    written.push(path.clone());
                    certificates.push(path);
                }
                Err(e) => {
                    self.uploads.remove_all(&written).await;
                    return Err(e);
                }
            }
        }

        Ok((document, certificates))
    }
}

fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}
