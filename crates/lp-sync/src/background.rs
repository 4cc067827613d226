use std::sync::Arc;

use lp_metrics::SyncTrigger;
use lp_types::ChainId;
use tokio_util::task::TaskTracker;

use crate::PositionSyncer;

/// Fire-and-forget wallet syncs kicked off by API requests.
///
/// Failures are logged by the syncer and never reach the caller. Tracked
/// tasks are drained on shutdown instead of being dropped mid-write.
#[derive(Clone)]
pub struct BackgroundSyncs {
    syncer: Arc<PositionSyncer>,
    tracker: TaskTracker,
}

impl BackgroundSyncs {
    pub fn new(syncer: Arc<PositionSyncer>) -> Self {
        Self {
            syncer,
            tracker: TaskTracker::new(),
        }
    }

    pub fn spawn_wallet_sync(&self, owner: &str, chain: ChainId) {
        let syncer = self.syncer.clone();
        let owner = owner.to_string();
        self.tracker.spawn(async move {
            // error already logged and counted by the syncer
            let _ = syncer
                .sync_wallet(&owner, chain, SyncTrigger::Registration)
                .await;
        });
    }

    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Stops accepting work and waits for running syncs to finish.
    pub async fn shutdown(&self) {
        self.tracker.close();
        if !self.tracker.is_empty() {
            tracing::info!("[SyncService] ⏳ Waiting for {} background syncs", self.tracker.len());
        }
        self.tracker.wait().await;
    }
}
