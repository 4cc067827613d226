use std::collections::HashMap;

use lp_types::PositionDetails;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Query parameters for the position list endpoint
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PositionsQuery {
    pub wallet: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionSummary {
    pub total_positions: usize,
    #[serde(rename = "totalValueUSD")]
    pub total_value_usd: f64,
    #[serde(rename = "totalFeesUSD")]
    pub total_fees_usd: f64,
    pub in_range_positions: usize,
    pub out_of_range_positions: usize,
}

impl PositionSummary {
    pub fn from_positions(positions: &[PositionDetails]) -> Self {
        let in_range_positions = positions.iter().filter(|p| p.in_range).count();
        Self {
            total_positions: positions.len(),
            total_value_usd: positions.iter().map(|p| p.position_value.total_usd).sum(),
            total_fees_usd: positions.iter().map(|p| p.unclaimed_fees.total_usd).sum(),
            in_range_positions,
            out_of_range_positions: positions.len() - in_range_positions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PositionList {
    /// The requested wallet as given, or `"all"`.
    pub wallet: String,
    pub positions: Vec<PositionDetails>,
    pub summary: PositionSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolSummary {
    /// `"<symbol0>/<symbol1>"`.
    pub pair: String,
    pub pool_address: String,
    pub position_count: usize,
    #[serde(rename = "totalValueUSD")]
    pub total_value_usd: f64,
    #[serde(rename = "totalFeesUSD")]
    pub total_fees_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregateView {
    pub total_positions: usize,
    #[serde(rename = "totalValueUSD")]
    pub total_value_usd: f64,
    #[serde(rename = "totalFeesEarnedUSD")]
    pub total_fees_earned_usd: f64,
    pub by_pool: Vec<PoolSummary>,
}

impl AggregateView {
    /// Groups by symbol pair, in first-seen order. Pools sharing a pair are
    /// merged and report the first position's pool id.
    pub fn from_positions(positions: &[PositionDetails]) -> Self {
        let mut by_pool: Vec<PoolSummary> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for position in positions {
            let pair = format!(
                "{}/{}",
                position.pool.token0.symbol, position.pool.token1.symbol
            );
            let slot = *index.entry(pair.clone()).or_insert_with(|| {
                by_pool.push(PoolSummary {
                    pair,
                    pool_address: position.pool.address.clone(),
                    position_count: 0,
                    total_value_usd: 0.0,
                    total_fees_usd: 0.0,
                });
                by_pool.len() - 1
            });

            let summary = &mut by_pool[slot];
            summary.position_count += 1;
            summary.total_value_usd += position.position_value.total_usd;
            summary.total_fees_usd += position.unclaimed_fees.total_usd;
        }

        let totals = PositionSummary::from_positions(positions);
        Self {
            total_positions: totals.total_positions,
            total_value_usd: totals.total_value_usd,
            total_fees_earned_usd: totals.total_fees_usd,
            by_pool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lp_types::{PoolView, PositionValue, TokenRef, UnclaimedFees};

    fn details(pool: &str, symbols: (&str, &str), value: f64, fees: f64, in_range: bool) -> PositionDetails {
        let token = |symbol: &str| TokenRef {
            address: format!("0x{symbol}"),
            symbol: symbol.to_string(),
            decimals: 18,
        };
        PositionDetails {
            token_id: "1".to_string(),
            owner: "0xowner".to_string(),
            pool: PoolView {
                address: pool.to_string(),
                token0: token(symbols.0),
                token1: token(symbols.1),
                fee: 3000,
                hook_address: None,
            },
            liquidity: "0".to_string(),
            tick_lower: 0,
            tick_upper: 0,
            current_tick: 0,
            in_range,
            unclaimed_fees: UnclaimedFees {
                token0: "0.0".to_string(),
                token1: "0.0".to_string(),
                token0_usd: fees,
                token1_usd: 0.0,
                total_usd: fees,
            },
            position_value: PositionValue {
                token0_amount: "0".to_string(),
                token1_amount: "0".to_string(),
                token0_usd: 0.0,
                token1_usd: 0.0,
                total_usd: value,
            },
            created_at: Utc::now(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let positions = vec![
            details("0xa", ("ETH", "USDC"), 10.0, 1.0, true),
            details("0xa", ("ETH", "USDC"), 5.0, 0.5, false),
            details("0xb", ("WBTC", "ETH"), 1.0, 0.0, true),
        ];
        let summary = PositionSummary::from_positions(&positions);
        assert_eq!(summary.total_positions, 3);
        assert_eq!(summary.in_range_positions, 2);
        assert_eq!(summary.out_of_range_positions, 1);
        assert!((summary.total_value_usd - 16.0).abs() < 1e-9);
        assert!((summary.total_fees_usd - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_groups_by_pair_in_first_seen_order() {
        let positions = vec![
            details("0xb", ("WBTC", "ETH"), 1.0, 0.25, true),
            details("0xa", ("ETH", "USDC"), 100.0, 2.0, true),
            details("0xc", ("ETH", "USDC"), 50.0, 1.0, false),
        ];
        let aggregate = AggregateView::from_positions(&positions);

        assert_eq!(aggregate.total_positions, 3);
        assert!((aggregate.total_value_usd - 151.0).abs() < 1e-9);
        assert!((aggregate.total_fees_earned_usd - 3.25).abs() < 1e-9);
        assert_eq!(aggregate.by_pool.len(), 2);
        assert_eq!(aggregate.by_pool[0].pair, "WBTC/ETH");

        let eth_usdc = &aggregate.by_pool[1];
        assert_eq!(eth_usdc.pair, "ETH/USDC");
        assert_eq!(eth_usdc.pool_address, "0xa");
        assert_eq!(eth_usdc.position_count, 2);
        assert!((eth_usdc.total_value_usd - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_aggregate() {
        let aggregate = AggregateView::from_positions(&[]);
        assert_eq!(aggregate.total_positions, 0);
        assert!(aggregate.by_pool.is_empty());

        let json = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(json["totalFeesEarnedUSD"], 0.0);
        assert!(json["byPool"].as_array().unwrap().is_empty());
    }
}
