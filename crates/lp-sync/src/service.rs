use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use lp_db::PositionStore;
use lp_metrics::SyncTrigger;
use lp_types::ChainId;

use crate::PositionSyncer;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncRound {
    pub wallets: usize,
    pub positions: usize,
    pub failures: usize,
}

/// Re-syncs every registered wallet on a fixed interval.
pub struct SyncService {
    syncer: Arc<PositionSyncer>,
    store: Arc<dyn PositionStore>,
    chain: ChainId,
    interval: Duration,
}

impl SyncService {
    pub fn new(
        syncer: Arc<PositionSyncer>,
        store: Arc<dyn PositionStore>,
        chain: ChainId,
        interval: Duration,
    ) -> Self {
        Self {
            syncer,
            store,
            chain,
            interval,
        }
    }

    /// A zero interval disables periodic syncing; the future then only
    /// completes on cancellation.
    pub async fn run_forever(&self) -> Result<()> {
        if self.interval.is_zero() {
            tracing::info!("[SyncService] ⏸️ Periodic sync disabled");
            return std::future::pending().await;
        }

        loop {
            tokio::time::sleep(self.interval).await;

            if let Err(e) = self.sync_all_wallets().await {
                tracing::error!("[SyncService] 🔴 Error in periodic sync cycle: {e}");
            }
        }
    }

    /// One sync pass. A failing wallet is counted and skipped; only a failure
    /// to list wallets aborts the round.
    pub async fn sync_all_wallets(&self) -> Result<SyncRound> {
        tracing::info!("[SyncService] 🔄 Starting periodic sync on chain {}", self.chain);
        let start_time = Utc::now();

        let wallets = self.store.list_wallets().await?;
        let mut round = SyncRound {
            wallets: wallets.len(),
            ..SyncRound::default()
        };

        for wallet in wallets {
            match self
                .syncer
                .sync_wallet(&wallet.address, self.chain, SyncTrigger::Periodic)
                .await
            {
                Ok(synced) => round.positions += synced,
                Err(_) => round.failures += 1,
            }
        }

        let duration = Utc::now() - start_time;
        tracing::info!(
            "[SyncService] ✅ Periodic sync completed in {}s. Wallets: {}, Positions: {}, Errors: {}",
            duration.num_seconds(),
            round.wallets,
            round.positions,
            round.failures
        );

        Ok(round)
    }
}
