use alloy_primitives::{Address, B256, address, keccak256};
use alloy_sol_types::{SolValue, sol};

sol! {
    interface IPositionManager {
        struct PoolKey {
            address currency0;
            address currency1;
            uint24 fee;
            int24 tickSpacing;
            address hooks;
        }

        function getPoolAndPositionInfo(uint256 tokenId)
            external view returns (PoolKey memory poolKey, uint256 info);
        function getPositionLiquidity(uint256 tokenId) external view returns (uint128 liquidity);
    }

    interface IStateView {
        function getSlot0(bytes32 poolId) external view returns (
            uint160 sqrtPriceX96, int24 tick, uint24 protocolFee, uint24 lpFee
        );
    }

    interface IERC20Metadata {
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function name() external view returns (string);
    }
}

/// Mainnet V4 `PositionManager`.
pub const DEFAULT_POSITION_MANAGER: Address = address!("bd216513d74c8cf14cf4747e6aaa6420ff64ee9e");
/// Mainnet V4 `StateView` lens.
pub const DEFAULT_STATE_VIEW: Address = address!("7ffe42c4a5deea5b0fec41c94c136cf115597227");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    pub position_manager: Address,
    pub state_view: Address,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            position_manager: DEFAULT_POSITION_MANAGER,
            state_view: DEFAULT_STATE_VIEW,
        }
    }
}

/// Pool id as the pool manager derives it: `keccak256(abi.encode(poolKey))`.
pub fn pool_id(key: &IPositionManager::PoolKey) -> B256 {
    keccak256(key.abi_encode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::aliases::{I24, U24};

    fn usdc_eth_key(fee: u32) -> IPositionManager::PoolKey {
        IPositionManager::PoolKey {
            currency0: Address::ZERO,
            currency1: address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
            fee: U24::from(fee),
            tickSpacing: I24::try_from(10_i32).unwrap(),
            hooks: Address::ZERO,
        }
    }

    #[test]
    fn test_pool_id_hashes_static_tuple_encoding() {
        let key = usdc_eth_key(500);

        // five static words, no offset prefix
        let mut encoded = Vec::with_capacity(160);
        encoded.extend_from_slice(&[0_u8; 32]);
        encoded.extend_from_slice(&[0_u8; 12]);
        encoded.extend_from_slice(key.currency1.as_slice());
        let mut fee_word = [0_u8; 32];
        fee_word[30..].copy_from_slice(&500_u16.to_be_bytes());
        encoded.extend_from_slice(&fee_word);
        let mut spacing_word = [0_u8; 32];
        spacing_word[31] = 10;
        encoded.extend_from_slice(&spacing_word);
        encoded.extend_from_slice(&[0_u8; 32]);

        assert_eq!(key.abi_encode().len(), 160);
        assert_eq!(pool_id(&key), keccak256(&encoded));
    }

    #[test]
    fn test_pool_id_depends_on_fee() {
        assert_ne!(pool_id(&usdc_eth_key(500)), pool_id(&usdc_eth_key(3000)));
    }
}
