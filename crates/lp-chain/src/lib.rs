pub mod contracts;
pub mod error;
pub mod reader;
pub mod subgraph;
pub mod types;

use async_trait::async_trait;
use lp_types::{ChainId, TokenInfo};

pub use contracts::ContractAddresses;
pub use error::ChainError;
pub use lp_types::{validate_address, validate_address_checksum};
pub use reader::EvmChainReader;
pub use subgraph::{PositionIndex, SubgraphIndex};
pub use types::{PoolKeyData, PositionData};

/// Typed read access to the supported chains.
///
/// Token metadata never fails (it degrades to placeholder records); every
/// other read propagates upstream failures.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Token ids held by `owner`, in index order.
    async fn get_position_token_ids(
        &self,
        owner: &str,
        chain: ChainId,
    ) -> Result<Vec<String>, ChainError>;

    async fn get_position_data(
        &self,
        token_id: &str,
        chain: ChainId,
    ) -> Result<PositionData, ChainError>;

    async fn get_token_info(&self, address: &str, chain: ChainId) -> TokenInfo;

    async fn get_current_tick(&self, pool_id: &str, chain: ChainId) -> Result<i32, ChainError>;
}
