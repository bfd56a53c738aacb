//! SeaORM implementation of SeatLockRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::{db_err, is_unique_violation};
use crate::domain::seat_lock::{LockStats, SeatLockRepository, TemporaryLock};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::temporary_seat_lock as lock;

pub struct SeaOrmSeatLockRepository {
    db: DatabaseConnection,
}

impl SeaOrmSeatLockRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: lock::Model) -> TemporaryLock {
    TemporaryLock {
        id: m.id,
        seat_id: m.seat_id,
        slot_id: m.slot_id,
        seat_number: m.seat_number,
        session_id: m.session_id,
        locked_at: m.locked_at,
        expires_at: m.expires_at,
        active: m.active,
    }
}

pub(super) async fn deactivate_expired<C: ConnectionTrait>(
    db: &C,
    now: DateTime<Utc>,
) -> DomainResult<u64> {
    let res = lock::Entity::update_many()
        .col_expr(lock::Column::Active, Expr::value(false))
        .filter(lock::Column::Active.eq(true))
        .filter(lock::Column::ExpiresAt.lte(now))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected)
}

pub(super) async fn release_by_session<C: ConnectionTrait>(
    db: &C,
    session_id: &str,
) -> DomainResult<u64> {
    let res = lock::Entity::update_many()
        .col_expr(lock::Column::Active, Expr::value(false))
        .filter(lock::Column::Active.eq(true))
        .filter(lock::Column::SessionId.eq(session_id))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected)
}

/// Active, unexpired locks on the seats, optionally excluding one session
pub(super) async fn live_locks<C: ConnectionTrait>(
    db: &C,
    seat_ids: &[i32],
    excluding_session: Option<&str>,
    now: DateTime<Utc>,
) -> DomainResult<Vec<TemporaryLock>> {
    if seat_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = lock::Entity::find()
        .filter(lock::Column::SeatId.is_in(seat_ids.iter().copied()))
        .filter(lock::Column::Active.eq(true))
        .filter(lock::Column::ExpiresAt.gt(now));
    if let Some(session_id) = excluding_session {
        query = query.filter(lock::Column::SessionId.ne(session_id));
    }

    let models = query
        .order_by_asc(lock::Column::SeatNumber)
        .all(db)
        .await
        .map_err(db_err)?;
    Ok(models.into_iter().map(model_to_domain).collect())
}

/// Insert one active lock; the partial unique index turns a concurrent
/// holder into `Ok(false)`.
pub(super) async fn try_insert<C: ConnectionTrait>(
    db: &C,
    l: &TemporaryLock,
) -> DomainResult<bool> {
    let model = lock::ActiveModel {
        seat_id: Set(l.seat_id),
        slot_id: Set(l.slot_id),
        seat_number: Set(l.seat_number.clone()),
        session_id: Set(l.session_id.clone()),
        locked_at: Set(l.locked_at),
        expires_at: Set(l.expires_at),
        active: Set(true),
        ..Default::default()
    };

    match model.insert(db).await {
        Ok(_) => Ok(true),
        Err(e) if is_unique_violation(&e) => {
            debug!(seat = %l.seat_number, "Active lock already present");
            Ok(false)
        }
        Err(e) => Err(db_err(e)),
    }
}

#[async_trait]
impl SeatLockRepository for SeaOrmSeatLockRepository {
    async fn find_by_session(&self, session_id: &str) -> DomainResult<Vec<TemporaryLock>> {
        let models = lock::Entity::find()
            .filter(lock::Column::SessionId.eq(session_id))
            .filter(lock::Column::Active.eq(true))
            .order_by_asc(lock::Column::SeatNumber)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_live_for_seats(
        &self,
        seat_ids: &[i32],
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<TemporaryLock>> {
        live_locks(&self.db, seat_ids, None, now).await
    }

    async fn deactivate_expired(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        deactivate_expired(&self.db, now).await
    }

    async fn release_by_session(&self, session_id: &str) -> DomainResult<u64> {
        release_by_session(&self.db, session_id).await
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> DomainResult<u64> {
        let res = lock::Entity::delete_many()
            .filter(lock::Column::ExpiresAt.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(res.rows_affected)
    }

    async fn delete_locked_before(&self, cutoff: DateTime<Utc>) -> DomainResult<u64> {
        let res = lock::Entity::delete_many()
            .filter(lock::Column::LockedAt.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(res.rows_affected)
    }

    async fn delete_inactive(&self) -> DomainResult<u64> {
        let res = lock::Entity::delete_many()
            .filter(lock::Column::Active.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(res.rows_affected)
    }

    async fn stats(&self, now: DateTime<Utc>) -> DomainResult<LockStats> {
        let total = lock::Entity::find().count(&self.db).await.map_err(db_err)?;
        let active = lock::Entity::find()
            .filter(lock::Column::Active.eq(true))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        let expired = lock::Entity::find()
            .filter(lock::Column::Active.eq(true))
            .filter(lock::Column::ExpiresAt.lte(now))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        Ok(LockStats {
            total,
            active,
            inactive: total.saturating_sub(active),
            expired,
        })
    }
}
