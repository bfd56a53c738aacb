//! Mapping of domain failures onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::ApiResponse;
use crate::domain::DomainError;

/// Body of a 409 response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConflictBody {
    pub message: String,
    pub conflicting_seats: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    BadRequest(String),
    /// Seat conflict carrying the caller's session id
    Conflict {
        seats: Vec<String>,
        session_id: Option<String>,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn conflict(seats: Vec<String>, session_id: Option<String>) -> Self {
        Self::Conflict { seats, session_id }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::SeatConflict(seats) => Self::Conflict {
                seats,
                session_id: None,
            },
            other => Self::Domain(other),
        }
    }
}

fn conflict_response(seats: Vec<String>, session_id: Option<String>) -> Response {
    let body = ConflictBody {
        message: format!("Seats no longer available: {}", seats.join(", ")),
        conflicting_seats: seats,
        session_id,
    };
    (StatusCode::CONFLICT, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Conflict { seats, session_id } => return conflict_response(seats, session_id),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Domain(e) => match e {
                DomainError::SeatConflict(seats) => return conflict_response(seats, None),
                not_found @ DomainError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, not_found.to_string())
                }
                DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
                DomainError::PaymentFailed(msg) => {
                    (StatusCode::BAD_REQUEST, format!("Payment failed: {}", msg))
                }
                DomainError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
                DomainError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
                DomainError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal server error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn conflict_lists_seats_and_session() {
        let resp = ApiError::conflict(vec!["A2".into()], Some("session_y".into())).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let json = body_json(resp).await;
        assert_eq!(json["conflictingSeats"], serde_json::json!(["A2"]));
        assert_eq!(json["sessionId"], "session_y");
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let resp = ApiError::from(DomainError::Internal("pool timed out".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Internal server error");
    }

    #[test]
    fn status_mapping() {
        let cases = [
            (DomainError::not_found("Slot", "id", 1), StatusCode::NOT_FOUND),
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::PaymentFailed("declined".into()), StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (DomainError::SeatConflict(vec!["A1".into()]), StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
