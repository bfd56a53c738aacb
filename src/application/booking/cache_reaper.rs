//! Periodic eviction of stale selection snapshots.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::selection_cache::SelectionCache;
use crate::shared::shutdown::ShutdownSignal;

/// Start the selection cache sweeper.
///
/// Runs every `every` (default 10 minutes) and removes entries older than
/// the cache TTL.
pub fn start_cache_reaper(cache: Arc<SelectionCache>, every: Duration, shutdown: ShutdownSignal) {
    tokio::spawn(async move {
        info!(interval_secs = every.as_secs(), "🗑️ Selection cache reaper started");

        let mut interval = tokio::time::interval(every);
        // First tick fires immediately
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let evicted = cache.sweep();
                    if evicted > 0 {
                        metrics::counter!("selection_cache_evictions_total").increment(evicted as u64);
                        debug!(evicted, remaining = cache.len(), "Selection cache swept");
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("🗑️ Selection cache reaper shutting down");
                    break;
                }
            }
        }
    });
}
