use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use role_cell::RoleSummary;
use shared_models::auth::UserRecord;

/// Token and (optionally) the user payload the backend's login returned.
#[derive(Debug, Clone, Deserialize)]
pub struct AdoptSessionRequest {
    pub token: String,
    #[serde(default)]
    pub user: Option<Value>,
}

/// A session the client kept in local storage.
#[derive(Debug, Clone, Deserialize)]
pub struct RestoreSessionRequest {
    pub token: String,
    #[serde(default)]
    pub user: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserRecord,
    pub role: RoleSummary,
    pub verified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreSessionResponse {
    pub user: UserRecord,
    /// Whether the stored record had to be upgraded and should be saved again.
    pub migrated: bool,
    pub role: RoleSummary,
    pub verified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
    /// False when the backend could not be told; local state is cleared anyway.
    pub backend_notified: bool,
}
