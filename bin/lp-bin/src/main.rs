mod cli;

use std::sync::Arc;
use std::time::Duration;

use crate::cli::TrackerCli;
use anyhow::{Result, bail};
use clap::Parser;
use dotenvy::dotenv;
use pragma_common::{
    services::{Service, ServiceGroup},
    telemetry::init_telemetry,
};

use lp_api::{ApiService, ApiSettings, AppState};
use lp_chain::{ContractAddresses, EvmChainReader, SubgraphIndex};
use lp_db::{PgStore, PositionStore, init_pool, run_migrations};
use lp_metrics::MetricsRegistry;
use lp_quoting::{CoinGeckoSource, PriceService};
use lp_sync::{BackgroundSyncs, PositionDetailsAssembler, PositionSyncer, SyncTask};
use lp_types::ChainId;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cli = TrackerCli::parse();

    let app_name = "lp_tracker";
    if let Err(e) = init_telemetry(app_name, cli.otel_collector_endpoint.clone()) {
        bail!("Could not init telemetry: {e}");
    }

    let sync_chain = ChainId::try_from(cli.sync_chain_id)?;
    let rpc_timeout = Duration::from_secs(cli.rpc_timeout_seconds);
    let metrics = MetricsRegistry::new();

    let position_index = Arc::new(SubgraphIndex::new(
        &cli.graph_api_url,
        cli.graph_api_key.clone(),
        cli.subgraph_ids(),
        rpc_timeout,
    )?);
    let chain_reader = Arc::new(EvmChainReader::new(
        cli.rpc_urls(),
        ContractAddresses {
            position_manager: cli.position_manager_address,
            state_view: cli.state_view_address,
        },
        position_index,
        rpc_timeout,
    ));
    if !chain_reader.configured_chains().contains(&sync_chain) {
        tracing::warn!(chain = %sync_chain, "No RPC URL configured for the sync chain");
    }

    let price_source = Arc::new(CoinGeckoSource::new(
        &cli.coingecko_api_url,
        cli.coingecko_api_key.clone(),
    )?);
    let prices = Arc::new(
        PriceService::new(price_source, Duration::from_secs(cli.cache_ttl_seconds))
            .with_metrics(metrics.prices.clone()),
    );

    let pool = init_pool(app_name, &cli.database_url)?;
    run_migrations(&pool).await?;
    let store: Arc<dyn PositionStore> = Arc::new(PgStore::new(pool));

    let syncer = Arc::new(
        PositionSyncer::new(chain_reader.clone(), store.clone()).with_metrics(metrics.sync.clone()),
    );
    let details = Arc::new(PositionDetailsAssembler::new(
        chain_reader,
        store.clone(),
        prices,
    ));
    let background = BackgroundSyncs::new(syncer.clone());

    let app_state = AppState {
        store: store.clone(),
        syncer: syncer.clone(),
        details,
        background: background.clone(),
        settings: Arc::new(ApiSettings {
            api_key: cli.api_key,
            environment: cli.node_env,
            default_chain: sync_chain,
            strict_checksum: cli.strict_address_checksum,
        }),
    };

    let api_service = ApiService::new(app_state, "0.0.0.0", cli.port);

    let sync_service = SyncTask::new(
        syncer,
        store,
        background,
        sync_chain,
        Duration::from_secs(cli.sync_interval_minutes * 60),
    );

    ServiceGroup::default()
        .with(api_service)
        .with(sync_service)
        .start_and_drive_to_end()
        .await?;

    Ok(())
}
