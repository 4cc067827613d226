mod memory;
mod pg;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::DatabaseError;
use crate::models::{NewPosition, NewWallet, Position, Wallet};

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Persistence for wallets and positions.
///
/// Lookups take already-normalized (lower-cased) addresses. A duplicate
/// wallet address is reported as [`DatabaseError::UniqueViolation`].
#[async_trait]
pub trait PositionStore: Send + Sync {
    async fn create_wallet(&self, wallet: NewWallet) -> Result<Wallet, DatabaseError>;

    async fn find_wallet(&self, address: &str) -> Result<Option<Wallet>, DatabaseError>;

    async fn list_wallets(&self) -> Result<Vec<Wallet>, DatabaseError>;

    /// Removes the wallet record only. Returns `false` when nothing matched.
    async fn delete_wallet(&self, address: &str) -> Result<bool, DatabaseError>;

    /// Number of stored positions keyed by owner address.
    async fn position_counts(&self) -> Result<HashMap<String, i64>, DatabaseError>;

    async fn count_positions_by_owner(&self, owner: &str) -> Result<i64, DatabaseError>;

    async fn find_position(&self, token_id: &str) -> Result<Option<Position>, DatabaseError>;

    async fn positions_by_owner(&self, owner: &str) -> Result<Vec<Position>, DatabaseError>;

    async fn all_positions(&self) -> Result<Vec<Position>, DatabaseError>;

    /// Creates the position or fully overwrites the stored one with the same token id.
    async fn upsert_position(&self, position: NewPosition) -> Result<Position, DatabaseError>;
}
