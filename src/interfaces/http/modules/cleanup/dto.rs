//! Cleanup DTOs

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub success: bool,
    pub message: String,
    pub deleted_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupStatusResponse {
    pub total_locks: u64,
    pub active_locks: u64,
    pub inactive_locks: u64,
    /// Still flagged active but past `expiresAt`
    pub expired_locks: u64,
    pub auto_cleanup_enabled: bool,
    pub cleanup_interval_secs: u64,
    pub deep_cleanup_hours: i64,
}
