use std::sync::Arc;

use chrono::Utc;
use lp_chain::{ChainReader, PositionData};
use lp_db::PositionStore;
use lp_db::models::{NewPosition, Position, normalize_address};
use lp_metrics::{SyncMetrics, SyncTrigger};
use lp_types::{ChainId, TokenInfo};

use crate::SyncError;

/// Pulls positions from chain and writes them through to the store.
pub struct PositionSyncer {
    chain: Arc<dyn ChainReader>,
    store: Arc<dyn PositionStore>,
    metrics: Option<Arc<SyncMetrics>>,
}

impl PositionSyncer {
    pub fn new(chain: Arc<dyn ChainReader>, store: Arc<dyn PositionStore>) -> Self {
        Self {
            chain,
            store,
            metrics: None,
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<SyncMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Syncs every position the index lists for `owner`, in index order.
    /// The first failing position aborts the rest; positions already written
    /// stay written.
    pub async fn sync_wallet_positions(
        &self,
        owner: &str,
        chain: ChainId,
    ) -> Result<usize, SyncError> {
        let owner = normalize_address(owner);
        tracing::info!(owner = %owner, chain = %chain, "Syncing positions");

        let token_ids = self.chain.get_position_token_ids(&owner, chain).await?;
        for token_id in &token_ids {
            self.sync_position(token_id, &owner, chain).await?;
        }

        tracing::info!(
            owner = %owner,
            chain = %chain,
            "Synced {} positions",
            token_ids.len()
        );
        Ok(token_ids.len())
    }

    /// [`Self::sync_wallet_positions`] with failure logging and metrics for
    /// callers that do not surface the error themselves.
    pub async fn sync_wallet(
        &self,
        owner: &str,
        chain: ChainId,
        trigger: SyncTrigger,
    ) -> Result<usize, SyncError> {
        let result = self.sync_wallet_positions(owner, chain).await;
        if let Err(e) = &result {
            tracing::error!(
                owner = %owner,
                chain = %chain,
                trigger = trigger.as_str(),
                error = %e,
                "Position sync failed"
            );
            if let Some(metrics) = &self.metrics {
                metrics.record_wallet_sync_failure(chain, trigger);
            }
        }
        result
    }

    /// Fetches one position and fully overwrites (or creates) its stored row.
    pub async fn sync_position(
        &self,
        token_id: &str,
        owner: &str,
        chain: ChainId,
    ) -> Result<Position, SyncError> {
        let data = self.chain.get_position_data(token_id, chain).await?;
        if !data.info.has_valid_range() {
            return Err(SyncError::InvalidTickRange {
                token_id: token_id.to_string(),
                tick_lower: data.info.tick_lower,
                tick_upper: data.info.tick_upper,
            });
        }

        let (token0, token1) = tokio::join!(
            self.chain.get_token_info(&data.pool_key.currency0, chain),
            self.chain.get_token_info(&data.pool_key.currency1, chain),
        );

        let position = new_position(owner, chain, data, &token0, &token1);
        let stored = self.store.upsert_position(position).await?;

        if let Some(metrics) = &self.metrics {
            metrics.record_position_synced(chain);
        }
        tracing::debug!(token_id = %token_id, pool_id = %stored.pool_id, "Position synced");
        Ok(stored)
    }
}

fn new_position(
    owner: &str,
    chain: ChainId,
    data: PositionData,
    token0: &TokenInfo,
    token1: &TokenInfo,
) -> NewPosition {
    NewPosition {
        token_id: data.token_id,
        owner: normalize_address(owner),
        pool_id: data.pool_id,
        token0_address: data.pool_key.currency0,
        token0_symbol: token0.symbol.clone(),
        token0_decimals: i32::from(token0.decimals),
        token1_address: data.pool_key.currency1,
        token1_symbol: token1.symbol.clone(),
        token1_decimals: i32::from(token1.decimals),
        fee: data.pool_key.fee as i32,
        tick_spacing: data.pool_key.tick_spacing,
        hook_address: data.pool_key.hooks,
        liquidity: data.liquidity,
        tick_lower: data.info.tick_lower,
        tick_upper: data.info.tick_upper,
        fee_growth_inside0_last_x128: data.fee_growth_inside0_last_x128,
        fee_growth_inside1_last_x128: data.fee_growth_inside1_last_x128,
        tokens_owed0: data.tokens_owed0,
        tokens_owed1: data.tokens_owed1,
        has_subscriber: data.info.has_subscriber,
        chain_id: i64::from(chain),
        last_synced_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeChain, USDC, WALLET, position_data};
    use lp_db::MemoryStore;

    fn syncer(chain: FakeChain) -> (PositionSyncer, Arc<FakeChain>, Arc<MemoryStore>) {
        let chain = Arc::new(chain);
        let store = Arc::new(MemoryStore::new());
        (
            PositionSyncer::new(chain.clone(), store.clone()),
            chain,
            store,
        )
    }

    #[tokio::test]
    async fn test_sync_creates_positions_in_index_order() {
        let chain = FakeChain::default()
            .with_owner(WALLET, &["1", "2"])
            .with_position(position_data("1", -600, 600))
            .with_position(position_data("2", 100, 200));
        let (syncer, _chain, store) = syncer(chain);

        let before = Utc::now();
        let synced = syncer
            .sync_wallet_positions(&WALLET.to_uppercase().replace("0X", "0x"), ChainId::Ethereum)
            .await
            .unwrap();
        assert_eq!(synced, 2);

        let positions = store.positions_by_owner(WALLET).await.unwrap();
        assert_eq!(positions.len(), 2);
        for position in &positions {
            assert_eq!(position.owner, WALLET);
            assert!(position.last_synced_at >= before);
            assert_eq!(position.token0_symbol, "ETH");
            assert_eq!(position.token1_symbol, "USDC");
            assert_eq!(position.token1_decimals, 6);
            assert_eq!(position.token1_address, USDC);
            assert_eq!(position.chain_id, 1);
            assert_eq!(position.tokens_owed0, "0");
        }
        let second = store.find_position("2").await.unwrap().unwrap();
        assert_eq!((second.tick_lower, second.tick_upper), (100, 200));
    }

    #[tokio::test]
    async fn test_resync_overwrites_fields() {
        let chain = FakeChain::default()
            .with_owner(WALLET, &["9"])
            .with_position(position_data("9", -10, 10));
        let (syncer, chain, store) = syncer(chain);
        let first = syncer.sync_position("9", WALLET, ChainId::Ethereum).await.unwrap();

        let mut moved = position_data("9", 50, 70);
        moved.liquidity = "42".to_string();
        moved.pool_key.hooks = None;
        chain.replace_position(moved);
        let second = syncer.sync_position("9", WALLET, ChainId::Ethereum).await.unwrap();

        assert_eq!(second.created_at, first.created_at);
        assert!(second.last_synced_at >= first.last_synced_at);
        assert_eq!((second.tick_lower, second.tick_upper), (50, 70));
        assert_eq!(second.liquidity, "42");
        assert_eq!(second.hook_address, None);
        assert_eq!(store.all_positions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_first_failure_aborts_remaining_positions() {
        let chain = FakeChain::default()
            .with_owner(WALLET, &["1", "missing", "3"])
            .with_position(position_data("1", 0, 10))
            .with_position(position_data("3", 0, 10));
        let (syncer, _chain, store) = syncer(chain);

        let err = syncer
            .sync_wallet(WALLET, ChainId::Ethereum, SyncTrigger::Manual)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Chain(_)));
        assert!(store.find_position("1").await.unwrap().is_some());
        assert!(store.find_position("3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_inverted_tick_range_is_rejected() {
        let chain = FakeChain::default().with_position(position_data("5", 300, -300));
        let (syncer, _chain, store) = syncer(chain);

        let err = syncer
            .sync_position("5", WALLET, ChainId::Ethereum)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::InvalidTickRange { tick_lower: 300, tick_upper: -300, .. }
        ));
        assert!(store.find_position("5").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_token_metadata_does_not_fail_sync() {
        let mut data = position_data("8", 0, 60);
        data.pool_key.currency1 = "0x1111111111111111111111111111111111111111".to_string();
        let chain = FakeChain::default().with_position(data);
        let (syncer, _chain, _store) = syncer(chain);

        let stored = syncer.sync_position("8", WALLET, ChainId::Ethereum).await.unwrap();
        assert_eq!(stored.token1_symbol, "UNKNOWN");
        assert_eq!(stored.token1_decimals, 18);
    }

    #[tokio::test]
    async fn test_index_outage_propagates() {
        let chain = FakeChain::default()
            .with_owner(WALLET, &["1"])
            .with_position(position_data("1", 0, 10));
        let (syncer, chain, store) = syncer(chain);
        chain.set_index_down(true);

        let err = syncer
            .sync_wallet_positions(WALLET, ChainId::Ethereum)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::Chain(lp_chain::ChainError::Unavailable { .. })
        ));
        assert!(store.all_positions().await.unwrap().is_empty());
    }
}
