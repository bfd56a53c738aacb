//! Shared fixtures for unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use serde_json::json;

use crate::domain::payment::{
    CardDetails, GatewayStatus, PaymentGateway, PaymentReceipt, RefundReceipt,
};
use crate::domain::{DomainError, DomainResult, NewSlot, RepositoryProvider, Slot};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub async fn memory_db() -> DatabaseConnection {
    let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn memory_repos() -> Arc<dyn RepositoryProvider> {
    Arc::new(SeaOrmRepositoryProvider::new(memory_db().await))
}

/// File-backed SQLite with a multi-connection pool, for tests that need
/// transactions to really contend. Returns the file path for cleanup.
pub async fn file_repos(name: &str) -> (Arc<dyn RepositoryProvider>, std::path::PathBuf) {
    let path = std::env::temp_dir().join(format!("seatlock_{}_{}.db", name, uuid::Uuid::new_v4()));
    let mut config = DatabaseConfig::sqlite(&path.to_string_lossy());
    config.pool.max_connections = 8;
    let db = init_database(&config).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    (Arc::new(SeaOrmRepositoryProvider::new(db)), path)
}

pub async fn seed_slot(repos: &Arc<dyn RepositoryProvider>, seats: &[(&str, f64)]) -> Slot {
    repos
        .slots()
        .create_with_seats(
            NewSlot {
                movie_title: "Night Train".into(),
                show_date: NaiveDate::from_ymd_opt(2026, 11, 20).unwrap(),
                start_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(21, 45, 0).unwrap(),
                theater_name: "Screen 3".into(),
                screen_type: "IMAX".into(),
            },
            seats
                .iter()
                .map(|(n, p)| (n.to_string(), *p))
                .collect(),
        )
        .await
        .unwrap()
}

/// A1 (100), A2 (100), A3 (50)
pub async fn seed_scenario(repos: &Arc<dyn RepositoryProvider>) -> Slot {
    seed_slot(repos, &[("A1", 100.0), ("A2", 100.0), ("A3", 50.0)]).await
}

pub fn seats(numbers: &[&str]) -> Vec<String> {
    numbers.iter().map(|s| s.to_string()).collect()
}

pub fn card() -> CardDetails {
    CardDetails {
        card_number: "4111111111111111".into(),
        card_holder_name: "Jane Roe".into(),
        expiry_date: "12/29".into(),
        cvv: "123".into(),
    }
}

/// Gateway with a fixed answer that counts calls
pub struct ScriptedGateway {
    approve: bool,
    refund_ok: bool,
    pub charges: AtomicUsize,
    pub refunds: AtomicUsize,
}

impl ScriptedGateway {
    pub fn approving() -> Arc<Self> {
        Arc::new(Self {
            approve: true,
            refund_ok: true,
            charges: AtomicUsize::new(0),
            refunds: AtomicUsize::new(0),
        })
    }

    pub fn declining() -> Arc<Self> {
        Arc::new(Self {
            approve: false,
            refund_ok: true,
            charges: AtomicUsize::new(0),
            refunds: AtomicUsize::new(0),
        })
    }

    pub fn broken_refunds() -> Arc<Self> {
        Arc::new(Self {
            approve: true,
            refund_ok: false,
            charges: AtomicUsize::new(0),
            refunds: AtomicUsize::new(0),
        })
    }

    pub fn charge_count(&self) -> usize {
        self.charges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn process(
        &self,
        amount: f64,
        _method: &str,
        _card: &CardDetails,
    ) -> DomainResult<PaymentReceipt> {
        let n = self.charges.fetch_add(1, Ordering::SeqCst);
        if !self.approve {
            return Ok(PaymentReceipt {
                status: GatewayStatus::Failed,
                payment_id: None,
                message: "Payment declined by bank".into(),
                details: json!({}),
            });
        }
        Ok(PaymentReceipt {
            status: GatewayStatus::Success,
            payment_id: Some(format!("TEST_PAY_{n}")),
            message: "ok".into(),
            details: json!({ "gateway": "TEST", "amount": amount }),
        })
    }

    async fn refund(&self, payment_id: &str, _amount: f64) -> DomainResult<RefundReceipt> {
        self.refunds.fetch_add(1, Ordering::SeqCst);
        if !self.refund_ok {
            return Err(DomainError::Internal("gateway unreachable".into()));
        }
        Ok(RefundReceipt {
            status: GatewayStatus::Success,
            refund_id: Some(format!("REFUND_{payment_id}")),
            message: "ok".into(),
        })
    }
}
