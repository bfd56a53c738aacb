use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Seats held by another session or already booked. An empty list
    /// means the store rejected the write without naming the seats.
    #[error("Seats unavailable: {}", .0.join(", "))]
    SeatConflict(Vec<String>),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Conflicts are negotiated outcomes, not failures.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::SeatConflict(_))
    }
}
