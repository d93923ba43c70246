use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub company: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cv {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub full_name: String,
    pub birth_date: String,
    pub marital_status: String,
    pub education_status: String,
    pub school_name: String,
    pub certificates: String,
    pub experience: Json<Vec<Experience>>,
    pub cv_document: Option<String>,
    pub certificate_files: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything a submission writes; the applicant link is resolved separately.
#[derive(Debug, Clone, PartialEq)]
pub struct CvFields {
    pub full_name: String,
    pub birth_date: String,
    pub marital_status: String,
    pub education_status: String,
    pub school_name: String,
    pub certificates: String,
    pub experience: Vec<Experience>,
    pub cv_document: Option<String>,
    pub certificate_files: Vec<String>,
}

/// Admin listing row: a CV plus the applicant it belongs to.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CvWithApplicant {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub cv: Cv,
    pub user_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
