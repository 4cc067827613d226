use std::sync::Arc;

use lp_types::ChainId;
use opentelemetry::{KeyValue, global, metrics::Counter};

const METER_NAME: &str = "lp-tracker";

#[derive(Debug)]
pub struct MetricsRegistry {
    pub sync: Arc<SyncMetrics>,
    pub prices: Arc<PriceMetrics>,
}

impl MetricsRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sync: SyncMetrics::new(),
            prices: PriceMetrics::new(),
        })
    }
}

#[derive(Debug)]
pub struct SyncMetrics {
    positions_synced: Counter<u64>,
    wallet_sync_failures: Counter<u64>,
}

impl SyncMetrics {
    pub fn new() -> Arc<Self> {
        let meter = global::meter(METER_NAME);
        let positions_synced = meter
            .u64_counter("positions_synced_total")
            .with_description("Number of positions written by the sync pipeline")
            .with_unit("count")
            .init();

        let wallet_sync_failures = meter
            .u64_counter("wallet_sync_failures_total")
            .with_description("Number of wallet syncs aborted by an upstream or store failure")
            .with_unit("count")
            .init();

        Arc::new(Self {
            positions_synced,
            wallet_sync_failures,
        })
    }

    pub fn record_position_synced(&self, chain: ChainId) {
        self.positions_synced
            .add(1, &[KeyValue::new("chain_id", chain.id().to_string())]);
    }

    pub fn record_wallet_sync_failure(&self, chain: ChainId, trigger: SyncTrigger) {
        self.wallet_sync_failures.add(
            1,
            &[
                KeyValue::new("chain_id", chain.id().to_string()),
                KeyValue::new("trigger", trigger.as_str()),
            ],
        );
    }
}

#[derive(Debug)]
pub struct PriceMetrics {
    fallbacks: Counter<u64>,
}

impl PriceMetrics {
    pub fn new() -> Arc<Self> {
        let fallbacks = global::meter(METER_NAME)
            .u64_counter("price_fallbacks_total")
            .with_description("Price lookups answered from a stale entry or with zero")
            .with_unit("count")
            .init();

        Arc::new(Self { fallbacks })
    }

    pub fn record_fallback(&self, chain: ChainId, kind: PriceFallback) {
        self.fallbacks.add(
            1,
            &[
                KeyValue::new("chain_id", chain.id().to_string()),
                KeyValue::new("kind", kind.as_str()),
            ],
        );
    }
}

/// What started a wallet sync.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncTrigger {
    Registration,
    Manual,
    Periodic,
}

impl SyncTrigger {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::Manual => "manual",
            Self::Periodic => "periodic",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceFallback {
    Stale,
    Zero,
}

impl PriceFallback {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stale => "stale",
            Self::Zero => "zero",
        }
    }
}
