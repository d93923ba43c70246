use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Internship,
    Contract,
}

impl JobType {
    /// Accepts the client spellings (`Full-Time`, `part_time`, ...): the value
    /// is lower-cased and its first hyphen becomes an underscore.
    pub fn normalize(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase().replacen('-', "_", 1);
        match normalized.as_str() {
            "full_time" => Some(JobType::FullTime),
            "part_time" => Some(JobType::PartTime),
            "internship" => Some(JobType::Internship),
            "contract" => Some(JobType::Contract),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_type: JobType,
    pub deadline: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct JobFields {
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_type: JobType,
    pub deadline: DateTime<Utc>,
}
