use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A position is in range when the pool tick sits inside `[tick_lower, tick_upper]`,
/// both bounds inclusive.
pub const fn is_in_range(tick_lower: i32, tick_upper: i32, current_tick: i32) -> bool {
    tick_lower <= current_tick && current_tick <= tick_upper
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenRef {
    pub address: String,
    pub symbol: String,
    pub decimals: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolView {
    /// Pool id (keccak of the pool key), not a contract address.
    pub address: String,
    pub token0: TokenRef,
    pub token1: TokenRef,
    pub fee: i32,
    pub hook_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UnclaimedFees {
    pub token0: String,
    pub token1: String,
    #[serde(rename = "token0USD")]
    pub token0_usd: f64,
    #[serde(rename = "token1USD")]
    pub token1_usd: f64,
    #[serde(rename = "totalUSD")]
    pub total_usd: f64,
}

/// Simplified valuation: token amounts are not derived from the tick range
/// and `total_usd` is the liquidity figure scaled by 1e18.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PositionValue {
    #[serde(rename = "token0Amount")]
    pub token0_amount: String,
    #[serde(rename = "token1Amount")]
    pub token1_amount: String,
    #[serde(rename = "token0USD")]
    pub token0_usd: f64,
    #[serde(rename = "token1USD")]
    pub token1_usd: f64,
    #[serde(rename = "totalUSD")]
    pub total_usd: f64,
}

/// Read model joining a stored position with live tick and price data.
/// Recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionDetails {
    pub token_id: String,
    pub owner: String,
    pub pool: PoolView,
    pub liquidity: String,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub current_tick: i32,
    pub in_range: bool,
    pub unclaimed_fees: UnclaimedFees,
    pub position_value: PositionValue,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_bounds() {
        assert!(is_in_range(100, 200, 150));
        assert!(!is_in_range(100, 200, 99));
        assert!(is_in_range(100, 200, 100));
        assert!(is_in_range(100, 200, 200));
        assert!(!is_in_range(100, 200, 201));
    }

    #[test]
    fn test_fee_fields_serialize_with_usd_suffix() {
        let fees = UnclaimedFees {
            token0: "1.5".to_string(),
            token1: "0.0".to_string(),
            token0_usd: 3.0,
            token1_usd: 0.0,
            total_usd: 3.0,
        };
        let json = serde_json::to_value(&fees).unwrap();
        assert_eq!(json["token0USD"], 3.0);
        assert_eq!(json["totalUSD"], 3.0);
    }
}
