use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use lp_chain::{ChainError, ChainReader, PoolKeyData, PositionData};
use lp_quoting::{PriceError, PriceSource};
use lp_types::{ChainId, PositionInfo, TokenInfo, ZERO_ADDRESS};

pub const WALLET: &str = "0xabcdef0123456789abcdef0123456789abcdef01";
pub const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
pub const POOL_ID: &str = "0x21c67e77068de97969ba93d4aab21826d33ca12bb9f565d8496e8fda8a82ca27";
pub const HOOKS: &str = "0x0000000000000000000000000000000000004444";

/// In-memory chain with per-position and per-pool scripting.
#[derive(Default)]
pub struct FakeChain {
    owners: Mutex<HashMap<String, Vec<String>>>,
    positions: Mutex<HashMap<String, PositionData>>,
    ticks: Mutex<HashMap<String, i32>>,
    index_down: AtomicBool,
}

impl FakeChain {
    pub fn with_owner(self, owner: &str, token_ids: &[&str]) -> Self {
        self.owners.lock().unwrap().insert(
            owner.to_string(),
            token_ids.iter().map(ToString::to_string).collect(),
        );
        self
    }

    pub fn with_position(self, data: PositionData) -> Self {
        self.replace_position(data);
        self
    }

    pub fn with_tick(self, pool_id: &str, tick: i32) -> Self {
        self.ticks.lock().unwrap().insert(pool_id.to_string(), tick);
        self
    }

    pub fn replace_position(&self, data: PositionData) {
        self.positions
            .lock()
            .unwrap()
            .insert(data.token_id.clone(), data);
    }

    pub fn set_index_down(&self, down: bool) {
        self.index_down.store(down, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn get_position_token_ids(
        &self,
        owner: &str,
        chain: ChainId,
    ) -> Result<Vec<String>, ChainError> {
        if self.index_down.load(Ordering::SeqCst) {
            return Err(ChainError::unavailable("subgraph", "connection refused"));
        }
        if chain != ChainId::Ethereum {
            return Err(ChainError::IndexNotConfigured(chain));
        }
        Ok(self
            .owners
            .lock()
            .unwrap()
            .get(owner)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_position_data(
        &self,
        token_id: &str,
        _chain: ChainId,
    ) -> Result<PositionData, ChainError> {
        self.positions
            .lock()
            .unwrap()
            .get(token_id)
            .cloned()
            .ok_or_else(|| ChainError::Rpc(format!("execution reverted for token {token_id}")))
    }

    async fn get_token_info(&self, address: &str, _chain: ChainId) -> TokenInfo {
        match address {
            ZERO_ADDRESS => TokenInfo::native(),
            USDC => TokenInfo {
                symbol: "USDC".to_string(),
                decimals: 6,
                name: "USD Coin".to_string(),
            },
            _ => TokenInfo::unknown(),
        }
    }

    async fn get_current_tick(&self, pool_id: &str, _chain: ChainId) -> Result<i32, ChainError> {
        self.ticks
            .lock()
            .unwrap()
            .get(pool_id)
            .copied()
            .ok_or_else(|| ChainError::unavailable("rpc", "request timed out"))
    }
}

/// ETH/USDC 0.05% position with a hook and one unit of liquidity.
pub fn position_data(token_id: &str, tick_lower: i32, tick_upper: i32) -> PositionData {
    PositionData {
        token_id: token_id.to_string(),
        pool_id: POOL_ID.to_string(),
        pool_key: PoolKeyData {
            currency0: ZERO_ADDRESS.to_string(),
            currency1: USDC.to_string(),
            fee: 500,
            tick_spacing: 10,
            hooks: Some(HOOKS.to_string()),
        },
        info: PositionInfo {
            tick_lower,
            tick_upper,
            has_subscriber: false,
        },
        liquidity: "1000000000000000000".to_string(),
        fee_growth_inside0_last_x128: "0".to_string(),
        fee_growth_inside1_last_x128: "0".to_string(),
        tokens_owed0: "0".to_string(),
        tokens_owed1: "0".to_string(),
    }
}

/// Fixed USD quotes; unlisted tokens fail.
#[derive(Default)]
pub struct FixedPrices(pub HashMap<String, f64>);

impl FixedPrices {
    pub fn with(mut self, token: &str, price: f64) -> Self {
        self.0.insert(token.to_string(), price);
        self
    }
}

#[async_trait]
impl PriceSource for FixedPrices {
    async fn fetch_usd_price(&self, token: &str, chain: ChainId) -> Result<f64, PriceError> {
        self.0
            .get(token)
            .copied()
            .ok_or_else(|| PriceError::MissingPrice {
                token: token.to_string(),
                chain,
            })
    }
}
