use alloy_primitives::{Address, U256};
use lp_types::PositionInfo;
use serde::{Deserialize, Serialize};

use crate::ChainError;
use crate::contracts::{IPositionManager, pool_id};

/// Placeholder for accumulator fields this version of the position manager
/// does not expose.
pub const UNAVAILABLE_AMOUNT: &str = "0";

fn lower_hex(address: Address) -> String {
    address.to_string().to_ascii_lowercase()
}

/// Decoded pool key. Addresses are lower-cased `0x` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolKeyData {
    pub currency0: String,
    pub currency1: String,
    pub fee: u32,
    pub tick_spacing: i32,
    /// `None` when the pool has no hook contract.
    pub hooks: Option<String>,
}

impl TryFrom<&IPositionManager::PoolKey> for PoolKeyData {
    type Error = ChainError;

    fn try_from(key: &IPositionManager::PoolKey) -> Result<Self, Self::Error> {
        let fee = u32::try_from(key.fee)
            .map_err(|e| ChainError::Decode(format!("pool fee: {e}")))?;
        let tick_spacing = i32::try_from(key.tickSpacing)
            .map_err(|e| ChainError::Decode(format!("tick spacing: {e}")))?;

        Ok(Self {
            currency0: lower_hex(key.currency0),
            currency1: lower_hex(key.currency1),
            fee,
            tick_spacing,
            hooks: (key.hooks != Address::ZERO).then(|| lower_hex(key.hooks)),
        })
    }
}

/// Everything the position manager tells us about one position NFT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionData {
    pub token_id: String,
    pub pool_id: String,
    pub pool_key: PoolKeyData,
    pub info: PositionInfo,
    /// uint128 as a decimal string.
    pub liquidity: String,
    pub fee_growth_inside0_last_x128: String,
    pub fee_growth_inside1_last_x128: String,
    pub tokens_owed0: String,
    pub tokens_owed1: String,
}

impl PositionData {
    pub fn from_contract(
        token_id: &str,
        pool_key: &IPositionManager::PoolKey,
        packed_info: U256,
        liquidity: u128,
    ) -> Result<Self, ChainError> {
        Ok(Self {
            token_id: token_id.to_string(),
            pool_id: pool_id(pool_key).to_string(),
            pool_key: PoolKeyData::try_from(pool_key)?,
            info: decode_position_info(packed_info),
            liquidity: liquidity.to_string(),
            fee_growth_inside0_last_x128: UNAVAILABLE_AMOUNT.to_string(),
            fee_growth_inside1_last_x128: UNAVAILABLE_AMOUNT.to_string(),
            tokens_owed0: UNAVAILABLE_AMOUNT.to_string(),
            tokens_owed1: UNAVAILABLE_AMOUNT.to_string(),
        })
    }
}

/// Only the low limb carries tick and subscriber bits.
pub fn decode_position_info(packed: U256) -> PositionInfo {
    PositionInfo::decode(packed.as_limbs()[0])
}

pub fn parse_token_id(token_id: &str) -> Result<U256, ChainError> {
    U256::from_str_radix(token_id, 10)
        .map_err(|e| ChainError::InvalidInput(format!("token id {token_id}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use alloy_primitives::aliases::{I24, U24};

    #[test]
    fn test_decode_ignores_high_bits() {
        // pool id prefix in the upper bits must not leak into the ticks
        let packed = (U256::from(0xDEAD_BEEF_u64) << 200)
            | U256::from(0x80_0000_u64)
            | (U256::from(0x7F_FFFF_u64) << 24);
        let info = decode_position_info(packed);
        assert_eq!(info.tick_lower, -8_388_608);
        assert_eq!(info.tick_upper, 8_388_607);
        assert!(!info.has_subscriber);
    }

    #[test]
    fn test_position_data_from_contract() {
        let key = IPositionManager::PoolKey {
            currency0: Address::ZERO,
            currency1: address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
            fee: U24::from(3000_u32),
            tickSpacing: I24::try_from(-60_i32).unwrap(),
            hooks: address!("0000000000000000000000000000000000000fff"),
        };
        let packed = U256::from(0xFF_FF88_u64) | (U256::from(120_u64) << 24) | (U256::from(1_u64) << 48);

        let data = PositionData::from_contract("42", &key, packed, 123_456_789_u128).unwrap();
        assert_eq!(data.pool_key.currency1, "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
        assert_eq!(data.pool_key.fee, 3000);
        assert_eq!(data.pool_key.tick_spacing, -60);
        assert_eq!(
            data.pool_key.hooks.as_deref(),
            Some("0x0000000000000000000000000000000000000fff")
        );
        assert_eq!(data.info.tick_lower, -120);
        assert_eq!(data.info.tick_upper, 120);
        assert!(data.info.has_subscriber);
        assert_eq!(data.liquidity, "123456789");
        assert_eq!(data.tokens_owed0, "0");
        assert!(data.pool_id.starts_with("0x"));
        assert_eq!(data.pool_id.len(), 66);
    }

    #[test]
    fn test_parse_token_id() {
        assert_eq!(parse_token_id("12345").unwrap(), U256::from(12345_u64));
        assert!(parse_token_id("0x10").is_err());
    }
}
