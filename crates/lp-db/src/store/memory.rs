use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::PositionStore;
use crate::errors::DatabaseError;
use crate::models::{NewPosition, NewWallet, Position, Wallet};

#[derive(Default)]
struct Tables {
    wallets: BTreeMap<String, Wallet>,
    positions: BTreeMap<String, Position>,
}

/// Process-local store with the same semantics as [`super::PgStore`].
/// Used by tests and by local runs without Postgres.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PositionStore for MemoryStore {
    async fn create_wallet(&self, wallet: NewWallet) -> Result<Wallet, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.wallets.contains_key(&wallet.address) {
            return Err(DatabaseError::unique_violation(
                format!("create wallet {}", wallet.address),
                "wallets_address_key",
            ));
        }

        let now = Utc::now();
        let created = Wallet {
            id: Uuid::new_v4(),
            address: wallet.address,
            label: wallet.label,
            tags: wallet.tags,
            created_at: now,
            updated_at: now,
        };
        tables
            .wallets
            .insert(created.address.clone(), created.clone());
        Ok(created)
    }

    async fn find_wallet(&self, address: &str) -> Result<Option<Wallet>, DatabaseError> {
        Ok(self.tables.read().await.wallets.get(address).cloned())
    }

    async fn list_wallets(&self) -> Result<Vec<Wallet>, DatabaseError> {
        let mut wallets: Vec<Wallet> = self.tables.read().await.wallets.values().cloned().collect();
        wallets.sort_by_key(|w| w.created_at);
        Ok(wallets)
    }

    async fn delete_wallet(&self, address: &str) -> Result<bool, DatabaseError> {
        Ok(self.tables.write().await.wallets.remove(address).is_some())
    }

    async fn position_counts(&self) -> Result<HashMap<String, i64>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut counts = HashMap::new();
        for position in tables.positions.values() {
            *counts.entry(position.owner.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn count_positions_by_owner(&self, owner: &str) -> Result<i64, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.positions.values().filter(|p| p.owner == owner).count() as i64)
    }

    async fn find_position(&self, token_id: &str) -> Result<Option<Position>, DatabaseError> {
        Ok(self.tables.read().await.positions.get(token_id).cloned())
    }

    async fn positions_by_owner(&self, owner: &str) -> Result<Vec<Position>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .positions
            .values()
            .filter(|p| p.owner == owner)
            .cloned()
            .collect())
    }

    async fn all_positions(&self) -> Result<Vec<Position>, DatabaseError> {
        Ok(self.tables.read().await.positions.values().cloned().collect())
    }

    async fn upsert_position(&self, position: NewPosition) -> Result<Position, DatabaseError> {
        let mut tables = self.tables.write().await;
        let created_at = tables
            .positions
            .get(&position.token_id)
            .map_or_else(Utc::now, |existing| existing.created_at);
        let stored = position.into_position(created_at);
        tables
            .positions
            .insert(stored.token_id.clone(), stored.clone());
        Ok(stored)
    }
}
