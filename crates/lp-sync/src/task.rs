use std::sync::Arc;
use std::time::Duration;

use lp_db::PositionStore;
use lp_types::ChainId;
use pragma_common::services::{Service, ServiceRunner};

use crate::{BackgroundSyncs, PositionSyncer, SyncService};

pub struct SyncTask {
    syncer: Arc<PositionSyncer>,
    store: Arc<dyn PositionStore>,
    background: BackgroundSyncs,
    chain: ChainId,
    interval: Duration,
}

impl SyncTask {
    pub fn new(
        syncer: Arc<PositionSyncer>,
        store: Arc<dyn PositionStore>,
        background: BackgroundSyncs,
        chain: ChainId,
        interval: Duration,
    ) -> Self {
        Self {
            syncer,
            store,
            background,
            chain,
            interval,
        }
    }
}

#[async_trait::async_trait]
impl Service for SyncTask {
    async fn start<'a>(&mut self, mut runner: ServiceRunner<'a>) -> anyhow::Result<()> {
        let syncer = self.syncer.clone();
        let store = self.store.clone();
        let background = self.background.clone();
        let chain = self.chain;
        let interval = self.interval;

        runner.spawn_loop(move |ctx| async move {
            let sync_service = SyncService::new(syncer, store, chain, interval);

            if let Some(result) = ctx.run_until_cancelled(sync_service.run_forever()).await {
                result?;
            }

            // registration syncs still running are allowed to finish their writes
            background.shutdown().await;

            anyhow::Ok(())
        });

        Ok(())
    }
}
