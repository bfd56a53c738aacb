//! Booking HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};
use tracing::warn;

use crate::application::booking::{BookingCommitter, CommitRequest, LockManager};
use crate::domain::DomainError;
use crate::interfaces::http::common::{ApiError, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::seats::{header_str, SESSION_HEADER};

use super::dto::*;

#[derive(Clone)]
pub struct BookingAppState {
    pub committer: Arc<BookingCommitter>,
    pub locks: Arc<LockManager>,
}

#[utoipa::path(
    post,
    path = "/api/bookings/payment",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = PaymentBookingRequest,
    params(("X-Session-ID" = Option<String>, Header, description = "Selection session to release after booking")),
    responses(
        (status = 201, description = "Booking confirmed", body = BookingDto),
        (status = 400, description = "Validation or payment failure"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Slot or seats not found"),
        (status = 409, description = "Seats already booked", body = crate::interfaces::http::common::error::ConflictBody)
    )
)]
pub async fn create_payment_booking(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<PaymentBookingRequest>,
) -> Result<(StatusCode, Json<BookingDto>), ApiError> {
    let commit = CommitRequest {
        slot_id: request.slot_id,
        seat_numbers: request.seat_numbers.clone(),
        total_amount: request.total_amount,
        payment_method: request.payment_method.clone(),
        card: request.card(),
        user_email: user.email.clone(),
    };
    let booking = state.committer.commit(commit).await?;

    if let Some(session_id) = header_str(&headers, SESSION_HEADER) {
        if let Err(e) = state.locks.release(session_id).await {
            warn!(session_id, error = %e, "Failed to release locks after booking");
        }
    }

    Ok((StatusCode::CREATED, Json(booking.into())))
}

#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking", body = BookingDto),
        (status = 403, description = "Booking of another user"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<BookingDto>, ApiError> {
    let booking = state.committer.get(id, &user.email, user.is_admin()).await?;
    Ok(Json(booking.into()))
}

#[utoipa::path(
    get,
    path = "/api/bookings/my-bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Caller's bookings, newest first", body = Vec<BookingDto>))
)]
pub async fn my_bookings(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<BookingDto>>, ApiError> {
    let bookings = state.committer.list_for_user(&user.email).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    delete,
    path = "/api/bookings/{id}/cancel",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingDto),
        (status = 400, description = "Already cancelled"),
        (status = 403, description = "Booking of another user"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<BookingDto>, ApiError> {
    let booking = state.committer.cancel(id, &user.email).await?;
    Ok(Json(booking.into()))
}

#[utoipa::path(
    get,
    path = "/api/bookings/slot/{slot_id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("slot_id" = i32, Path, description = "Slot ID")),
    responses(
        (status = 200, description = "Bookings of the slot", body = Vec<BookingDto>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Slot not found")
    )
)]
pub async fn slot_bookings(
    State(state): State<BookingAppState>,
    Path(slot_id): Path<i32>,
) -> Result<Json<Vec<BookingDto>>, ApiError> {
    let bookings = state.committer.list_for_slot(slot_id).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    delete,
    path = "/api/bookings/admin/{id}/cancel",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingDto),
        (status = 400, description = "Already cancelled"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn admin_cancel_booking(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<BookingDto>, ApiError> {
    let cap = user
        .booking_override()
        .ok_or_else(|| DomainError::Forbidden("Admin role required".into()))?;
    let booking = state.committer.cancel_as_admin(id, cap).await?;
    Ok(Json(booking.into()))
}

#[utoipa::path(
    get,
    path = "/api/bookings/admin/all",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every booking, newest first", body = Vec<BookingDto>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn all_bookings(
    State(state): State<BookingAppState>,
) -> Result<Json<Vec<BookingDto>>, ApiError> {
    let bookings = state.committer.list_all().await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}
