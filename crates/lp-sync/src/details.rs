use std::sync::Arc;

use alloy_primitives::U256;
use alloy_primitives::utils::format_units;
use futures::future::try_join_all;
use lp_chain::ChainReader;
use lp_db::PositionStore;
use lp_db::models::{Position, normalize_address};
use lp_quoting::PriceService;
use lp_types::{
    ChainId, PoolView, PositionDetails, PositionValue, TokenRef, UnclaimedFees, is_in_range,
};

use crate::DetailsError;

/// Decimals the liquidity figure is scaled by for the simplified valuation.
const LIQUIDITY_DECIMALS: u8 = 18;

/// Joins stored positions with the live pool tick and token prices.
pub struct PositionDetailsAssembler {
    chain: Arc<dyn ChainReader>,
    store: Arc<dyn PositionStore>,
    prices: Arc<PriceService>,
}

impl PositionDetailsAssembler {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        store: Arc<dyn PositionStore>,
        prices: Arc<PriceService>,
    ) -> Self {
        Self {
            chain,
            store,
            prices,
        }
    }

    /// `Ok(None)` when the position was never synced. A failed tick read fails
    /// the whole lookup; missing prices only zero the USD figures.
    pub async fn get_position_details(
        &self,
        token_id: &str,
    ) -> Result<Option<PositionDetails>, DetailsError> {
        let Some(position) = self.store.find_position(token_id).await? else {
            return Ok(None);
        };
        self.assemble(position).await.map(Some)
    }

    pub async fn get_wallet_positions(
        &self,
        owner: &str,
    ) -> Result<Vec<PositionDetails>, DetailsError> {
        let positions = self
            .store
            .positions_by_owner(&normalize_address(owner))
            .await?;
        try_join_all(positions.into_iter().map(|p| self.assemble(p))).await
    }

    pub async fn get_all_positions(&self) -> Result<Vec<PositionDetails>, DetailsError> {
        let positions = self.store.all_positions().await?;
        try_join_all(positions.into_iter().map(|p| self.assemble(p))).await
    }

    async fn assemble(&self, position: Position) -> Result<PositionDetails, DetailsError> {
        let chain = ChainId::try_from(position.chain_id)?;
        let tokens = [
            (position.token0_address.as_str(), chain),
            (position.token1_address.as_str(), chain),
        ];

        let (tick, prices) = tokio::join!(
            self.chain.get_current_tick(&position.pool_id, chain),
            self.prices.get_prices_for_many(&tokens),
        );
        let current_tick = tick?;

        let price_of = |address: &str| {
            prices
                .get(&(address.to_ascii_lowercase(), chain))
                .copied()
                .unwrap_or_default()
        };
        let price0 = price_of(&position.token0_address);
        let price1 = price_of(&position.token1_address);

        let fees0 = format_amount("tokens_owed0", &position.tokens_owed0, position.token0_decimals)?;
        let fees1 = format_amount("tokens_owed1", &position.tokens_owed1, position.token1_decimals)?;
        let token0_usd = amount_to_f64(&fees0) * price0;
        let token1_usd = amount_to_f64(&fees1) * price1;

        let liquidity = format_amount(
            "liquidity",
            &position.liquidity,
            i32::from(LIQUIDITY_DECIMALS),
        )?;

        Ok(PositionDetails {
            in_range: is_in_range(position.tick_lower, position.tick_upper, current_tick),
            current_tick,
            pool: PoolView {
                address: position.pool_id,
                token0: TokenRef {
                    address: position.token0_address,
                    symbol: position.token0_symbol,
                    decimals: position.token0_decimals,
                },
                token1: TokenRef {
                    address: position.token1_address,
                    symbol: position.token1_symbol,
                    decimals: position.token1_decimals,
                },
                fee: position.fee,
                hook_address: position.hook_address,
            },
            unclaimed_fees: UnclaimedFees {
                token0: fees0,
                token1: fees1,
                token0_usd,
                token1_usd,
                total_usd: token0_usd + token1_usd,
            },
            position_value: PositionValue {
                token0_amount: "0".to_string(),
                token1_amount: "0".to_string(),
                token0_usd: 0.0,
                token1_usd: 0.0,
                total_usd: amount_to_f64(&liquidity),
            },
            token_id: position.token_id,
            owner: position.owner,
            liquidity: position.liquidity,
            tick_lower: position.tick_lower,
            tick_upper: position.tick_upper,
            created_at: position.created_at,
            last_updated: position.last_synced_at,
        })
    }
}

/// Formats a raw integer amount with `decimals` places, trimming trailing
/// zeros but keeping one fractional digit: `1500000` at 6 decimals is `"1.5"`,
/// zero is `"0.0"`.
pub fn format_amount(
    field: &'static str,
    raw: &str,
    decimals: i32,
) -> Result<String, DetailsError> {
    let invalid = |reason: String| DetailsError::InvalidAmount {
        field,
        value: raw.to_string(),
        reason,
    };

    let amount = U256::from_str_radix(raw, 10).map_err(|e| invalid(e.to_string()))?;
    let decimals = u8::try_from(decimals).map_err(|e| invalid(e.to_string()))?;
    let formatted = format_units(amount, decimals).map_err(|e| invalid(e.to_string()))?;

    Ok(match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => format!("{formatted}.0"),
    })
}

fn amount_to_f64(formatted: &str) -> f64 {
    formatted.parse().unwrap_or_default()
}
