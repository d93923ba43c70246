use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::profile::{ApplicantFields, RecruiterFields};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfilePayload {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl From<ApplicantProfilePayload> for ApplicantFields {
    fn from(value: ApplicantProfilePayload) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            city: value.city,
            country: value.country,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterProfilePayload {
    #[validate(length(max = 200))]
    pub company_name: Option<String>,
    #[validate(length(max = 100))]
    pub contact_name: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl From<RecruiterProfilePayload> for RecruiterFields {
    fn from(value: RecruiterProfilePayload) -> Self {
        Self {
            company_name: value.company_name,
            contact_name: value.contact_name,
            phone: value.phone,
            city: value.city,
            country: value.country,
        }
    }
}
