use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventPayload {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventPayload {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEventPayload {
    pub user_id: Option<Uuid>,
}
