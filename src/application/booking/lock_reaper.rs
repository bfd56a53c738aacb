//! Lock store sweepers
//!
//! Two independent loops: the routine sweep deletes locks whose expiry
//! has passed, the deep sweep deletes any lock taken more than
//! `deep_cleanup_hours` ago regardless of its expiry. A failed run is
//! logged and the next tick retries.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{error, info, warn};

use crate::config::CleanupConfig;
use crate::domain::{DomainResult, LockStats, RepositoryProvider};
use crate::shared::shutdown::ShutdownSignal;

/// Permission to run a sweep on demand. Only obtainable from an admin role.
#[derive(Debug, Clone, Copy)]
pub struct ReapCapability {
    _private: (),
}

impl ReapCapability {
    pub fn from_role(role: &str) -> Option<Self> {
        role.eq_ignore_ascii_case("admin")
            .then_some(Self { _private: () })
    }
}

pub struct LockReaper {
    repos: Arc<dyn RepositoryProvider>,
    settings: CleanupConfig,
}

impl LockReaper {
    pub fn new(repos: Arc<dyn RepositoryProvider>, settings: CleanupConfig) -> Self {
        Self { repos, settings }
    }

    pub fn settings(&self) -> &CleanupConfig {
        &self.settings
    }

    /// Delete locks with `expires_at` before `now`
    pub async fn routine_sweep(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        let deleted = self.repos.seat_locks().delete_expired_before(now).await?;
        metrics::counter!("seat_locks_reaped_total", "sweep" => "routine").increment(deleted);
        if self.settings.log_cleanup_operations {
            info!(deleted, "🧹 Routine lock sweep finished");
        }
        Ok(deleted)
    }

    /// Delete locks taken before `now - deep_cleanup_hours`
    pub async fn deep_sweep(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        let cutoff = now - Duration::hours(self.settings.deep_cleanup_hours);
        let deleted = self.repos.seat_locks().delete_locked_before(cutoff).await?;
        metrics::counter!("seat_locks_reaped_total", "sweep" => "deep").increment(deleted);
        if deleted > 0 {
            warn!(deleted, %cutoff, "Deep sweep removed stale locks");
        }
        Ok(deleted)
    }

    /// Operator-triggered sweep: expired and inactive locks
    pub async fn manual_sweep(&self, _cap: ReapCapability) -> DomainResult<u64> {
        let now = Utc::now();
        let expired = self.repos.seat_locks().delete_expired_before(now).await?;
        let inactive = self.repos.seat_locks().delete_inactive().await?;
        let deleted = expired + inactive;
        metrics::counter!("seat_locks_reaped_total", "sweep" => "manual").increment(deleted);
        info!(expired, inactive, "🧹 Manual lock sweep finished");
        Ok(deleted)
    }

    pub async fn stats(&self) -> DomainResult<LockStats> {
        self.repos.seat_locks().stats(Utc::now()).await
    }

    /// Spawn both sweep loops unless auto cleanup is disabled. The loops
    /// end on shutdown.
    pub fn start(self: Arc<Self>, shutdown: ShutdownSignal) -> Vec<JoinHandle<()>> {
        if !self.settings.enable_auto_cleanup {
            info!("Automatic lock cleanup disabled");
            return Vec::new();
        }

        let every = std::time::Duration::from_secs(self.settings.cleanup_interval_secs.max(1));
        let deep_delay = std::time::Duration::from_secs(self.settings.deep_cleanup_initial_delay_secs);

        let routine = self.clone();
        let routine_shutdown = shutdown.clone();
        let routine_task = tokio::spawn(async move {
            info!(interval_secs = every.as_secs(), "🧹 Routine lock sweep started");
            let mut ticker = interval_at(Instant::now() + every, every);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = routine.routine_sweep(Utc::now()).await {
                            error!(error = %e, "Routine lock sweep failed");
                        }
                    }
                    _ = routine_shutdown.notified().wait() => break,
                }
            }
            info!("🧹 Routine lock sweep stopped");
        });

        let deep = self;
        let deep_task = tokio::spawn(async move {
            info!(
                interval_secs = every.as_secs(),
                initial_delay_secs = deep_delay.as_secs(),
                "🧹 Deep lock sweep started"
            );
            let mut ticker = interval_at(Instant::now() + deep_delay, every);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = deep.deep_sweep(Utc::now()).await {
                            error!(error = %e, "Deep lock sweep failed");
                        }
                    }
                    _ = shutdown.notified().wait() => break,
                }
            }
            info!("🧹 Deep lock sweep stopped");
        });

        vec![routine_task, deep_task]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::lock_manager::LockManager;
    use crate::domain::Seat;
    use crate::test_support::{memory_repos, seed_scenario};

    async fn setup() -> (Arc<dyn RepositoryProvider>, LockManager, Vec<Seat>) {
        let repos = memory_repos().await;
        let slot = seed_scenario(&repos).await;
        let seats = repos.seats().find_by_slot(slot.id).await.unwrap();
        let manager = LockManager::with_default_duration(repos.clone());
        (repos, manager, seats)
    }

    #[tokio::test]
    async fn routine_sweep_removes_expired_locks() {
        let (repos, manager, seats) = setup().await;
        let now = Utc::now();
        manager
            .acquire_at(&seats[..1], "old", now - Duration::minutes(10))
            .await
            .unwrap();
        manager.acquire_at(&seats[1..], "fresh", now).await.unwrap();

        let reaper = LockReaper::new(repos.clone(), CleanupConfig::default());
        assert_eq!(reaper.routine_sweep(now).await.unwrap(), 1);

        assert!(repos.seat_locks().find_by_session("old").await.unwrap().is_empty());
        let live = repos
            .seat_locks()
            .find_live_for_seats(&seats.iter().map(|s| s.id).collect::<Vec<_>>(), now)
            .await
            .unwrap();
        assert_eq!(live.len(), 2);
        assert!(live.iter().all(|l| l.expires_at >= now));
    }

    #[tokio::test]
    async fn deep_sweep_ignores_expiry() {
        let (repos, manager, seats) = setup().await;
        let now = Utc::now();
        manager
            .acquire_at(&seats[..1], "ancient", now - Duration::hours(2))
            .await
            .unwrap();
        manager.acquire_at(&seats[1..2], "recent", now).await.unwrap();

        let reaper = LockReaper::new(repos.clone(), CleanupConfig::default());
        assert_eq!(reaper.deep_sweep(now).await.unwrap(), 1);
        assert_eq!(repos.seat_locks().find_by_session("recent").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn manual_sweep_needs_admin_capability() {
        assert!(ReapCapability::from_role("user").is_none());
        let cap = ReapCapability::from_role("admin").unwrap();

        let (repos, manager, seats) = setup().await;
        manager
            .acquire_at(&seats[..2], "gone", Utc::now() - Duration::minutes(30))
            .await
            .unwrap();
        manager.acquire(&seats[2..], "kept").await.unwrap();

        let reaper = LockReaper::new(repos.clone(), CleanupConfig::default());
        assert_eq!(reaper.manual_sweep(cap).await.unwrap(), 2);
        let stats = reaper.stats().await.unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.active, 1);
    }

    #[tokio::test]
    async fn disabled_reaper_spawns_nothing() {
        let repos = memory_repos().await;
        let settings = CleanupConfig {
            enable_auto_cleanup: false,
            ..CleanupConfig::default()
        };
        let reaper = Arc::new(LockReaper::new(repos, settings));
        assert!(reaper.start(ShutdownSignal::new()).is_empty());
    }

    #[tokio::test]
    async fn routine_loop_reaps_and_stops_on_shutdown() {
        let (repos, manager, seats) = setup().await;
        let now = Utc::now();
        // Taken two hours ago but still valid for three more: only the deep
        // sweep would remove it.
        let long_hold = LockManager::new(repos.clone(), Duration::hours(5));
        long_hold
            .acquire_at(&seats[..1], "long", now - Duration::hours(2))
            .await
            .unwrap();
        manager
            .acquire_at(&seats[1..2], "old", now - Duration::minutes(10))
            .await
            .unwrap();

        let settings = CleanupConfig {
            cleanup_interval_secs: 1,
            deep_cleanup_initial_delay_secs: 3600,
            log_cleanup_operations: false,
            ..CleanupConfig::default()
        };
        let reaper = Arc::new(LockReaper::new(repos.clone(), settings));
        assert_eq!(reaper.stats().await.unwrap().total, 2);

        let shutdown = ShutdownSignal::new();
        let tasks = reaper.clone().start(shutdown.clone());
        assert_eq!(tasks.len(), 2);

        let mut remaining = 2;
        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            remaining = reaper.stats().await.unwrap().total;
            if remaining == 1 {
                break;
            }
        }
        assert_eq!(remaining, 1);

        // The deep loop has not fired yet, so the long hold survives.
        let held = repos.seat_locks().find_by_session("long").await.unwrap();
        assert_eq!(held.len(), 1);

        shutdown.trigger();
        for task in tasks {
            tokio::time::timeout(std::time::Duration::from_secs(2), task)
                .await
                .expect("sweep loop should stop on shutdown")
                .unwrap();
        }
    }
}
