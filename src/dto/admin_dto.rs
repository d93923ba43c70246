use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePayload {
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanPayload {
    #[serde(default)]
    pub banned: bool,
    pub reason: Option<String>,
}

/// Body of the admin delete endpoints. The acting admin is taken from the
/// session token, so a client-sent `adminId` is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModerationPayload {
    pub reason: Option<String>,
}
