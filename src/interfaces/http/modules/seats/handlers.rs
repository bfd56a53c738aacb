//! Seat HTTP handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::booking::{generate_session_id, SeatSelectionService, Selection};
use crate::interfaces::http::common::{ApiError, ValidatedJson};

use super::dto::*;

pub const SESSION_HEADER: &str = "x-session-id";
pub const USER_HEADER: &str = "x-user-id";
pub const LOCK_DURATION_HEADER: &str = "x-lock-duration";

#[derive(Clone)]
pub struct SeatAppState {
    pub selection: Arc<SeatSelectionService>,
}

/// Non-empty header value as text
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[utoipa::path(
    post,
    path = "/api/bookings/seats/check-availability",
    tag = "Seats",
    request_body = SeatSelectionRequest,
    params(("X-Session-ID" = Option<String>, Header, description = "Caller's selection session")),
    responses(
        (status = 200, description = "Availability per seat", body = AvailabilityResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Slot not found")
    )
)]
pub async fn check_availability(
    State(state): State<SeatAppState>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<SeatSelectionRequest>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let availability = state
        .selection
        .check_availability(
            request.slot_id,
            &request.seat_numbers,
            header_str(&headers, SESSION_HEADER),
        )
        .await?;

    let unavailable = availability.values().filter(|a| !**a).count();
    let message = if unavailable == 0 {
        "All requested seats are available".to_string()
    } else {
        format!("{} of the requested seats are unavailable", unavailable)
    };

    Ok(Json(AvailabilityResponse {
        slot_id: request.slot_id,
        seat_availability: availability,
        message,
    }))
}

#[utoipa::path(
    post,
    path = "/api/bookings/select-seats",
    tag = "Seats",
    request_body = SeatSelectionRequest,
    params(
        ("X-Session-ID" = Option<String>, Header, description = "Existing selection session"),
        ("X-User-ID" = Option<String>, Header, description = "User identifier, used to derive a session id")
    ),
    responses(
        (status = 200, description = "Seats locked", body = SelectionResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Slot or seats not found"),
        (status = 409, description = "Seats held by another session", body = crate::interfaces::http::common::error::ConflictBody)
    )
)]
pub async fn select_seats(
    State(state): State<SeatAppState>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<SeatSelectionRequest>,
) -> Result<Response, ApiError> {
    let user_id = header_str(&headers, USER_HEADER);
    let session_id = header_str(&headers, SESSION_HEADER)
        .map(String::from)
        .unwrap_or_else(|| generate_session_id(user_id));
    let user_key = user_id.unwrap_or(&session_id).to_string();

    let outcome = state
        .selection
        .select(request.slot_id, &request.seat_numbers, &session_id, &user_key)
        .await
        .map_err(|e| match e {
            crate::domain::DomainError::SeatConflict(seats) => {
                ApiError::conflict(seats, Some(session_id.clone()))
            }
            other => other.into(),
        })?;

    let snapshot = match outcome {
        Selection::Locked(snapshot) => snapshot,
        Selection::Conflict(seats) => return Err(ApiError::conflict(seats, Some(session_id))),
    };

    let duration = state.selection.lock_manager().lock_duration().num_seconds();
    let mut response = Json(SelectionResponse::from_snapshot(snapshot, duration)).into_response();
    if let Ok(value) = HeaderValue::from_str(&session_id) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
        .headers_mut()
        .insert(LOCK_DURATION_HEADER, HeaderValue::from(duration));
    Ok(response)
}

#[utoipa::path(
    delete,
    path = "/api/bookings/release-seats",
    tag = "Seats",
    params(("X-Session-ID" = String, Header, description = "Session whose locks to release")),
    responses(
        (status = 200, description = "Locks released", body = ReleaseResponse),
        (status = 400, description = "Missing X-Session-ID header")
    )
)]
pub async fn release_seats(
    State(state): State<SeatAppState>,
    headers: HeaderMap,
) -> Result<Json<ReleaseResponse>, ApiError> {
    let session_id = header_str(&headers, SESSION_HEADER)
        .ok_or_else(|| ApiError::bad_request("X-Session-ID header is required"))?
        .to_string();

    let released = state.selection.lock_manager().release(&session_id).await?;

    Ok(Json(ReleaseResponse {
        message: "Seats released".to_string(),
        session_id,
        released_count: released,
    }))
}
