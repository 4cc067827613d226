use std::time::{Duration, Instant};

use dashmap::DashMap;
use lp_types::ChainId;

#[derive(Debug, Clone, Copy)]
struct CachedPrice {
    price: f64,
    fetched_at: Instant,
}

/// USD prices keyed by (chain, lower-cased token address).
///
/// Expired entries are never evicted: they stay around so a failing refresh
/// can still answer with the last known price.
#[derive(Debug)]
pub struct PriceCache {
    entries: DashMap<(ChainId, String), CachedPrice>,
    ttl: Duration,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Price fetched less than one TTL ago.
    pub fn fresh(&self, chain: ChainId, token: &str) -> Option<f64> {
        self.entries
            .get(&(chain, token.to_owned()))
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.price)
    }

    /// Last known price regardless of age.
    pub fn last_known(&self, chain: ChainId, token: &str) -> Option<f64> {
        self.entries
            .get(&(chain, token.to_owned()))
            .map(|entry| entry.price)
    }

    pub fn insert(&self, chain: ChainId, token: &str, price: f64) {
        self.entries.insert(
            (chain, token.to_owned()),
            CachedPrice {
                price,
                fetched_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
