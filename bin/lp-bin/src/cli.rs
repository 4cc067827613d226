use std::collections::HashMap;

use alloy_primitives::Address;
use clap::{ArgAction, Parser};
use lp_chain::contracts::{DEFAULT_POSITION_MANAGER, DEFAULT_STATE_VIEW};
use lp_chain::subgraph::{
    DEFAULT_BASE_SUBGRAPH_ID, DEFAULT_ETHEREUM_SUBGRAPH_ID, DEFAULT_GRAPH_API_URL,
};
use lp_quoting::CoinGeckoSource;
use lp_types::ChainId;
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct TrackerCli {
    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// OTEL collector endpoint
    #[arg(long, env = "OTEL_COLLECTOR_ENDPOINT")]
    pub otel_collector_endpoint: Option<String>,

    /// API port
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Shared secret required on every /api route
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Runtime environment; "production" hides internal error details
    #[arg(long, env = "NODE_ENV", default_value = "development")]
    pub node_env: String,

    #[arg(long, env = "ETHEREUM_RPC_URL")]
    pub ethereum_rpc_url: Option<Url>,

    #[arg(long, env = "BASE_RPC_URL")]
    pub base_rpc_url: Option<Url>,

    #[arg(long, env = "ARBITRUM_RPC_URL")]
    pub arbitrum_rpc_url: Option<Url>,

    #[arg(long, env = "POSITION_MANAGER_ADDRESS", default_value_t = DEFAULT_POSITION_MANAGER)]
    pub position_manager_address: Address,

    #[arg(long, env = "STATE_VIEW_ADDRESS", default_value_t = DEFAULT_STATE_VIEW)]
    pub state_view_address: Address,

    /// Subgraph gateway base URL
    #[arg(long, env = "GRAPH_API_URL", default_value = DEFAULT_GRAPH_API_URL)]
    pub graph_api_url: String,

    #[arg(long, env = "GRAPH_API_KEY", hide_env_values = true)]
    pub graph_api_key: Option<String>,

    #[arg(long, env = "SUBGRAPH_ID_ETHEREUM", default_value = DEFAULT_ETHEREUM_SUBGRAPH_ID)]
    pub subgraph_id_ethereum: String,

    #[arg(long, env = "SUBGRAPH_ID_BASE", default_value = DEFAULT_BASE_SUBGRAPH_ID)]
    pub subgraph_id_base: String,

    #[arg(long, env = "SUBGRAPH_ID_ARBITRUM")]
    pub subgraph_id_arbitrum: Option<String>,

    #[arg(long, env = "COINGECKO_API_URL", default_value = CoinGeckoSource::DEFAULT_API_URL)]
    pub coingecko_api_url: String,

    #[arg(long, env = "COINGECKO_API_KEY", hide_env_values = true)]
    pub coingecko_api_key: Option<String>,

    /// Price cache TTL in seconds
    #[arg(long, env = "CACHE_TTL_SECONDS", default_value = "300")]
    pub cache_ttl_seconds: u64,

    /// Bound on every RPC and subgraph call, in seconds
    #[arg(long, env = "RPC_TIMEOUT_SECONDS", default_value = "10")]
    pub rpc_timeout_seconds: u64,

    /// Periodic resync of all wallets, in minutes; 0 disables it
    #[arg(long, env = "SYNC_INTERVAL_MINUTES", default_value = "5")]
    pub sync_interval_minutes: u64,

    /// Chain used for registration and periodic syncs
    #[arg(long, env = "SYNC_CHAIN_ID", default_value = "1")]
    pub sync_chain_id: u64,

    /// Reject mixed-case addresses with a bad EIP-55 checksum on wallet creation
    #[arg(long, env = "STRICT_ADDRESS_CHECKSUM", action = ArgAction::Set, default_value_t = false)]
    pub strict_address_checksum: bool,
}

impl TrackerCli {
    pub fn rpc_urls(&self) -> HashMap<ChainId, Url> {
        [
            (ChainId::Ethereum, &self.ethereum_rpc_url),
            (ChainId::Base, &self.base_rpc_url),
            (ChainId::Arbitrum, &self.arbitrum_rpc_url),
        ]
        .into_iter()
        .filter_map(|(chain, url)| url.clone().map(|url| (chain, url)))
        .collect()
    }

    pub fn subgraph_ids(&self) -> HashMap<ChainId, String> {
        let mut ids = HashMap::from([
            (ChainId::Ethereum, self.subgraph_id_ethereum.clone()),
            (ChainId::Base, self.subgraph_id_base.clone()),
        ]);
        if let Some(id) = &self.subgraph_id_arbitrum {
            ids.insert(ChainId::Arbitrum, id.clone());
        }
        ids
    }
}
