//! Cleanup HTTP handlers

use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};

use crate::application::booking::LockReaper;
use crate::domain::DomainError;
use crate::interfaces::http::common::ApiError;
use crate::interfaces::http::middleware::AuthenticatedUser;

use super::dto::*;

#[derive(Clone)]
pub struct CleanupAppState {
    pub reaper: Arc<LockReaper>,
}

#[utoipa::path(
    post,
    path = "/api/admin/cleanup/temporary-locks",
    tag = "Cleanup",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sweep finished", body = CleanupResponse),
        (status = 403, description = "Admin only")
    )
)]
pub async fn cleanup_temporary_locks(
    State(state): State<CleanupAppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<CleanupResponse>, ApiError> {
    let cap = user
        .reap_capability()
        .ok_or_else(|| DomainError::Forbidden("Admin role required".into()))?;
    let deleted = state.reaper.manual_sweep(cap).await?;

    Ok(Json(CleanupResponse {
        success: true,
        message: format!("Removed {} temporary seat locks", deleted),
        deleted_count: deleted,
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/cleanup/status",
    tag = "Cleanup",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Lock store counters and sweep settings", body = CleanupStatusResponse),
        (status = 403, description = "Admin only")
    )
)]
pub async fn cleanup_status(
    State(state): State<CleanupAppState>,
) -> Result<Json<CleanupStatusResponse>, ApiError> {
    let stats = state.reaper.stats().await?;
    let settings = state.reaper.settings();

    Ok(Json(CleanupStatusResponse {
        total_locks: stats.total,
        active_locks: stats.active,
        inactive_locks: stats.inactive,
        expired_locks: stats.expired,
        auto_cleanup_enabled: settings.enable_auto_cleanup,
        cleanup_interval_secs: settings.cleanup_interval_secs,
        deep_cleanup_hours: settings.deep_cleanup_hours,
    }))
}
