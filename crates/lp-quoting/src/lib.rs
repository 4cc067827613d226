pub mod cache;
pub mod coingecko;
pub mod error;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use lp_metrics::{PriceFallback, PriceMetrics};
use lp_types::ChainId;

pub use cache::PriceCache;
pub use coingecko::CoinGeckoSource;
pub use error::PriceError;

pub const DEFAULT_PRICE_TTL: Duration = Duration::from_secs(300);

/// Upstream USD quote for a token. Addresses are passed lower-cased.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_usd_price(&self, token: &str, chain: ChainId) -> Result<f64, PriceError>;
}

/// Cached USD price lookup.
///
/// Never fails: a failed refresh answers with the last known price, or with
/// `0.0` when the token was never priced.
pub struct PriceService {
    source: Arc<dyn PriceSource>,
    cache: PriceCache,
    metrics: Option<Arc<PriceMetrics>>,
}

impl PriceService {
    pub fn new(source: Arc<dyn PriceSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: PriceCache::new(ttl),
            metrics: None,
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<PriceMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub const fn cache(&self) -> &PriceCache {
        &self.cache
    }

    pub async fn get_price_usd(&self, token: &str, chain: ChainId) -> f64 {
        let token = token.to_ascii_lowercase();

        if let Some(price) = self.cache.fresh(chain, &token) {
            return price;
        }

        match self.source.fetch_usd_price(&token, chain).await {
            Ok(price) => {
                self.cache.insert(chain, &token, price);
                price
            }
            Err(e) => {
                if let Some(stale) = self.cache.last_known(chain, &token) {
                    tracing::warn!(
                        token = %token,
                        chain = %chain,
                        error = %e,
                        "Price refresh failed, serving stale price"
                    );
                    self.record_fallback(chain, PriceFallback::Stale);
                    stale
                } else {
                    tracing::warn!(
                        token = %token,
                        chain = %chain,
                        error = %e,
                        "Price lookup failed and no cached price, using 0"
                    );
                    self.record_fallback(chain, PriceFallback::Zero);
                    0.0
                }
            }
        }
    }

    /// Prices every distinct `(token, chain)` pair, keyed by lower-cased
    /// address and chain. Each pair degrades on its own.
    pub async fn get_prices_for_many(
        &self,
        tokens: &[(&str, ChainId)],
    ) -> HashMap<(String, ChainId), f64> {
        let mut unique: Vec<(String, ChainId)> = tokens
            .iter()
            .map(|(token, chain)| (token.to_ascii_lowercase(), *chain))
            .collect();
        unique.sort_unstable();
        unique.dedup();

        let prices = join_all(
            unique
                .iter()
                .map(|(token, chain)| self.get_price_usd(token, *chain)),
        )
        .await;
        unique.into_iter().zip(prices).collect()
    }

    fn record_fallback(&self, chain: ChainId, kind: PriceFallback) {
        if let Some(metrics) = &self.metrics {
            metrics.record_fallback(chain, kind);
        }
    }
}
