use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, B256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use lp_types::{ChainId, TokenInfo};
use moka::future::Cache;
use url::Url;

use crate::contracts::{ContractAddresses, IERC20Metadata, IPositionManager, IStateView};
use crate::subgraph::PositionIndex;
use crate::types::{PositionData, parse_token_id};
use crate::{ChainError, ChainReader};

const TOKEN_CACHE_CAPACITY: u64 = 10_000;

/// Reads V4 position state over JSON-RPC, one provider per configured chain.
pub struct EvmChainReader {
    providers: HashMap<ChainId, DynProvider>,
    contracts: ContractAddresses,
    index: Arc<dyn PositionIndex>,
    token_cache: Cache<(ChainId, Address), TokenInfo>,
    rpc_timeout: Duration,
}

impl EvmChainReader {
    pub fn new(
        rpc_urls: HashMap<ChainId, Url>,
        contracts: ContractAddresses,
        index: Arc<dyn PositionIndex>,
        rpc_timeout: Duration,
    ) -> Self {
        let providers = rpc_urls
            .into_iter()
            .map(|(chain, url)| {
                tracing::info!(chain = %chain, "RPC provider configured");
                (chain, ProviderBuilder::new().connect_http(url).erased())
            })
            .collect();

        Self {
            providers,
            contracts,
            index,
            // token metadata never changes, only the capacity bounds it
            token_cache: Cache::builder().max_capacity(TOKEN_CACHE_CAPACITY).build(),
            rpc_timeout,
        }
    }

    pub fn configured_chains(&self) -> Vec<ChainId> {
        let mut chains: Vec<ChainId> = self.providers.keys().copied().collect();
        chains.sort_unstable();
        chains
    }

    fn provider(&self, chain: ChainId) -> Result<&DynProvider, ChainError> {
        self.providers
            .get(&chain)
            .ok_or(ChainError::ProviderNotConfigured(chain))
    }

    async fn call<C: SolCall>(
        &self,
        chain: ChainId,
        to: Address,
        call: C,
    ) -> Result<C::Return, ChainError> {
        let provider = self.provider(chain)?;
        let tx = TransactionRequest::default()
            .to(to)
            .input(call.abi_encode().into());

        let output = tokio::time::timeout(self.rpc_timeout, provider.call(tx))
            .await
            .map_err(|_| {
                ChainError::unavailable(
                    "rpc",
                    format!("{} timed out after {:?}", C::SIGNATURE, self.rpc_timeout),
                )
            })?
            .map_err(|e| ChainError::Rpc(format!("{}: {e}", C::SIGNATURE)))?;

        C::abi_decode_returns(&output)
            .map_err(|e| ChainError::Decode(format!("{}: {e}", C::SIGNATURE)))
    }

    async fn read_token_metadata(
        &self,
        token: Address,
        chain: ChainId,
    ) -> Result<TokenInfo, ChainError> {
        let (symbol, decimals, name) = tokio::try_join!(
            self.call(chain, token, IERC20Metadata::symbolCall {}),
            self.call(chain, token, IERC20Metadata::decimalsCall {}),
            self.call(chain, token, IERC20Metadata::nameCall {}),
        )?;

        Ok(TokenInfo {
            symbol,
            decimals,
            name,
        })
    }
}

#[async_trait]
impl ChainReader for EvmChainReader {
    async fn get_position_token_ids(
        &self,
        owner: &str,
        chain: ChainId,
    ) -> Result<Vec<String>, ChainError> {
        self.index.get_token_ids_by_owner(owner, chain).await
    }

    async fn get_position_data(
        &self,
        token_id: &str,
        chain: ChainId,
    ) -> Result<PositionData, ChainError> {
        let id = parse_token_id(token_id)?;
        let manager = self.contracts.position_manager;

        let (pool_and_info, liquidity) = tokio::try_join!(
            self.call(
                chain,
                manager,
                IPositionManager::getPoolAndPositionInfoCall { tokenId: id },
            ),
            self.call(
                chain,
                manager,
                IPositionManager::getPositionLiquidityCall { tokenId: id },
            ),
        )?;

        PositionData::from_contract(
            token_id,
            &pool_and_info.poolKey,
            pool_and_info.info,
            liquidity,
        )
    }

    async fn get_token_info(&self, address: &str, chain: ChainId) -> TokenInfo {
        if TokenInfo::is_native_address(address) {
            return TokenInfo::native();
        }

        let Ok(token) = address.parse::<Address>() else {
            tracing::warn!(token = %address, "Malformed token address, using UNKNOWN metadata");
            return TokenInfo::unknown();
        };

        if let Some(cached) = self.token_cache.get(&(chain, token)).await {
            return cached;
        }

        match self.read_token_metadata(token, chain).await {
            Ok(info) => {
                self.token_cache.insert((chain, token), info.clone()).await;
                info
            }
            Err(e) => {
                tracing::warn!(
                    token = %address,
                    chain = %chain,
                    error = %e,
                    "Token metadata read failed, using UNKNOWN metadata"
                );
                TokenInfo::unknown()
            }
        }
    }

    async fn get_current_tick(&self, pool_id: &str, chain: ChainId) -> Result<i32, ChainError> {
        let pool_id = pool_id
            .parse::<B256>()
            .map_err(|e| ChainError::InvalidInput(format!("pool id {pool_id}: {e}")))?;

        let slot0 = self
            .call(
                chain,
                self.contracts.state_view,
                IStateView::getSlot0Call { poolId: pool_id },
            )
            .await?;

        i32::try_from(slot0.tick).map_err(|e| ChainError::Decode(format!("slot0 tick: {e}")))
    }
}
