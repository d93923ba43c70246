use serde::Serialize;

use crate::models::cv::Experience;
use crate::services::upload_service::UploadedFile;

/// Most certificate files a single submission may carry.
pub const MAX_CERTIFICATE_FILES: usize = 5;

/// A CV submission collected from a multipart form.
#[derive(Debug, Clone, Default)]
pub struct CvSubmission {
    pub user_id: Option<String>,
    pub full_name: Option<String>,
    pub birth_date: Option<String>,
    pub marital_status: Option<String>,
    pub education_status: Option<String>,
    pub school_name: Option<String>,
    pub certificates: Option<String>,
    pub experience: Option<String>,
    pub cv_document: Option<UploadedFile>,
    pub certificate_files: Vec<UploadedFile>,
}

impl CvSubmission {
    /// Text form fields land here; unknown names are ignored.
    pub fn set_text(&mut self, name: &str, value: String) {
        let slot = match name {
            "userId" => &mut self.user_id,
            "fullName" => &mut self.full_name,
            "birthDate" => &mut self.birth_date,
            "maritalStatus" => &mut self.marital_status,
            "educationStatus" => &mut self.education_status,
            "schoolName" => &mut self.school_name,
            "certificates" => &mut self.certificates,
            "experience" => &mut self.experience,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Experience arrives as a JSON array string; anything unparsable is
    /// treated as no experience.
    pub fn parsed_experience(&self) -> Vec<Experience> {
        self.experience
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvStatusResponse {
    pub success: bool,
    #[serde(rename = "hasCV")]
    pub has_cv: bool,
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_parsing_is_lenient() {
        let mut submission = CvSubmission::default();
        assert!(submission.parsed_experience().is_empty());

        submission.set_text(
            "experience",
            r#"[{"company":"Acme","position":"Intern","startDate":"2020-01"}]"#.into(),
        );
        let experience = submission.parsed_experience();
        assert_eq!(experience.len(), 1);
        assert_eq!(experience[0].company.as_deref(), Some("Acme"));
        assert_eq!(experience[0].end_date, None);

        submission.set_text("experience", "not json".into());
        assert!(submission.parsed_experience().is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut submission = CvSubmission::default();
        submission.set_text("fullName", "Ada Lovelace".into());
        submission.set_text("favouriteColour", "green".into());
        assert_eq!(submission.full_name.as_deref(), Some("Ada Lovelace"));
    }
}
