use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::job::{JobFields, JobType};
use crate::utils::{time::parse_deadline, validation::non_blank};

/// Job create/update body. Older clients send `description`, `type` and
/// `postedBy`; those are accepted as fallbacks for `details`, `jobType` and
/// `recruiterId`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub details: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub deadline: Option<String>,
    pub recruiter_id: Option<Uuid>,
    pub posted_by: Option<Uuid>,
}

impl JobPayload {
    pub fn recruiter(&self) -> Option<Uuid> {
        self.recruiter_id.or(self.posted_by)
    }

    /// Resolves aliases and checks that every required field is present.
    pub fn job_fields(&self, missing_message: &str) -> Result<JobFields> {
        let title = non_blank(self.title.as_deref());
        let details =
            non_blank(self.details.as_deref()).or_else(|| non_blank(self.description.as_deref()));
        let location = non_blank(self.location.as_deref());
        let job_type =
            non_blank(self.job_type.as_deref()).or_else(|| non_blank(self.kind.as_deref()));
        let deadline = non_blank(self.deadline.as_deref());

        let (Some(title), Some(details), Some(location), Some(job_type), Some(deadline)) =
            (title, details, location, job_type, deadline)
        else {
            return Err(Error::BadRequest(missing_message.to_string()));
        };

        let job_type = JobType::normalize(job_type).ok_or_else(|| {
            Error::BadRequest(
                "Invalid job type. Must be one of: full_time, part_time, internship, contract"
                    .to_string(),
            )
        })?;
        let deadline = parse_deadline(deadline)
            .ok_or_else(|| Error::BadRequest("Invalid deadline".to_string()))?;

        Ok(JobFields {
            title: title.to_string(),
            description: details.to_string(),
            location: location.to_string(),
            job_type,
            deadline,
        })
    }
}
