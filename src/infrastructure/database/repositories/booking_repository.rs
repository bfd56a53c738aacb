//! SeaORM implementation of BookingRepository

use async_trait::async_trait;
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::debug;

use super::db_err;
use crate::domain::booking::{
    Booking, BookingRepository, BookingStatus, NewBooking, PaymentStatus, TicketVerification,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{booking, booking_seat};

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn json_err(e: serde_json::Error) -> DomainError {
    DomainError::Internal(format!("Corrupt booking row: {}", e))
}

pub(super) fn model_to_domain(m: booking::Model) -> DomainResult<Booking> {
    let seat_numbers: Vec<String> = serde_json::from_str(&m.seat_numbers).map_err(json_err)?;
    let payment_details = match m.payment_details.as_deref() {
        Some(raw) => serde_json::from_str(raw).map_err(json_err)?,
        None => serde_json::Value::Null,
    };

    let verification = match (m.verification_token, m.random_string, m.qr_code) {
        (Some(verification_token), Some(random_string), Some(qr_code)) => {
            Some(TicketVerification {
                verification_token,
                random_string,
                qr_code,
                is_verified: m.is_verified,
                verification_time: m.verification_time,
                verified_by: m.verified_by,
            })
        }
        _ => None,
    };

    Ok(Booking {
        id: m.id,
        slot_id: m.slot_id,
        user_email: m.user_email,
        seat_numbers,
        status: BookingStatus::from_str(&m.status),
        payment_status: PaymentStatus::from_str(&m.payment_status),
        payment_id: m.payment_id,
        payment_method: m.payment_method,
        payment_details,
        total_amount: m.total_amount,
        booking_time: m.booking_time,
        verification,
    })
}

fn models_to_domain(models: Vec<booking::Model>) -> DomainResult<Vec<Booking>> {
    models.into_iter().map(model_to_domain).collect()
}

// ── Shared queries ──────────────────────────────────────────────

/// Insert the booking row and one `booking_seats` row per seat
pub(super) async fn insert<C: ConnectionTrait>(db: &C, b: NewBooking) -> DomainResult<Booking> {
    let seat_numbers = serde_json::to_string(&b.seat_numbers).map_err(json_err)?;
    let payment_details = serde_json::to_string(&b.payment_details).map_err(json_err)?;

    let created = booking::ActiveModel {
        slot_id: Set(b.slot_id),
        user_email: Set(b.user_email),
        seat_numbers: Set(seat_numbers),
        status: Set(BookingStatus::Confirmed.as_str().to_string()),
        payment_status: Set(PaymentStatus::Completed.as_str().to_string()),
        payment_id: Set(Some(b.payment_id)),
        payment_method: Set(b.payment_method),
        payment_details: Set(Some(payment_details)),
        total_amount: Set(b.total_amount),
        booking_time: Set(b.booking_time),
        verification_token: Set(None),
        random_string: Set(None),
        qr_code: Set(None),
        is_verified: Set(false),
        verification_time: Set(None),
        verified_by: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(db_err)?;

    for seat_number in &b.seat_numbers {
        booking_seat::ActiveModel {
            booking_id: Set(created.id),
            slot_id: Set(created.slot_id),
            seat_number: Set(seat_number.clone()),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(db_err)?;
    }

    debug!(booking_id = created.id, "Booking row inserted");
    model_to_domain(created)
}

pub(super) async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
    for_update: bool,
) -> DomainResult<Option<Booking>> {
    let mut query = booking::Entity::find_by_id(id);
    if for_update {
        query = query.lock_exclusive();
    }
    query
        .one(db)
        .await
        .map_err(db_err)?
        .map(model_to_domain)
        .transpose()
}

pub(super) async fn update_state<C: ConnectionTrait>(db: &C, b: &Booking) -> DomainResult<()> {
    let payment_details = serde_json::to_string(&b.payment_details).map_err(json_err)?;
    let res = booking::Entity::update_many()
        .col_expr(booking::Column::Status, Expr::value(b.status.as_str()))
        .col_expr(
            booking::Column::PaymentStatus,
            Expr::value(b.payment_status.as_str()),
        )
        .col_expr(booking::Column::PaymentDetails, Expr::value(payment_details))
        .filter(booking::Column::Id.eq(b.id))
        .exec(db)
        .await
        .map_err(db_err)?;

    if res.rows_affected == 0 {
        return Err(DomainError::not_found("Booking", "id", b.id));
    }
    Ok(())
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        find_by_id(&self.db, id, false).await
    }

    async fn find_all(&self) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .order_by_desc(booking::Column::BookingTime)
            .order_by_desc(booking::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_by_user(&self, user_email: &str) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::UserEmail.eq(user_email))
            .order_by_desc(booking::Column::BookingTime)
            .order_by_desc(booking::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_by_slot(&self, slot_id: i32) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::SlotId.eq(slot_id))
            .order_by_desc(booking::Column::BookingTime)
            .order_by_desc(booking::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn attach_verification(
        &self,
        booking_id: i32,
        v: &TicketVerification,
    ) -> DomainResult<bool> {
        let res = booking::Entity::update_many()
            .col_expr(
                booking::Column::VerificationToken,
                Expr::value(v.verification_token.clone()),
            )
            .col_expr(
                booking::Column::RandomString,
                Expr::value(v.random_string.clone()),
            )
            .col_expr(booking::Column::QrCode, Expr::value(v.qr_code.clone()))
            .col_expr(booking::Column::IsVerified, Expr::value(false))
            .filter(booking::Column::Id.eq(booking_id))
            .filter(booking::Column::VerificationToken.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }
}
