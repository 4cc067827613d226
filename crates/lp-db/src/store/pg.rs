use std::collections::HashMap;

use async_trait::async_trait;
use deadpool_diesel::postgres::Pool;
use diesel::OptionalExtension;

use super::PositionStore;
use crate::errors::DatabaseError;
use crate::models::{NewPosition, NewWallet, Position, Wallet};
use crate::pool::TrackerPool;

#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub const fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PositionStore for PgStore {
    async fn create_wallet(&self, wallet: NewWallet) -> Result<Wallet, DatabaseError> {
        self.pool
            .interact_with_context(format!("create wallet {}", wallet.address), move |conn| {
                Wallet::create(&wallet, conn)
            })
            .await
    }

    async fn find_wallet(&self, address: &str) -> Result<Option<Wallet>, DatabaseError> {
        let address = address.to_owned();
        self.pool
            .interact_with_context(format!("find wallet {address}"), move |conn| {
                Wallet::find_by_address(&address, conn).optional()
            })
            .await
    }

    async fn list_wallets(&self) -> Result<Vec<Wallet>, DatabaseError> {
        self.pool
            .interact_with_context("list wallets".to_string(), Wallet::find_all)
            .await
    }

    async fn delete_wallet(&self, address: &str) -> Result<bool, DatabaseError> {
        let address = address.to_owned();
        let deleted = self
            .pool
            .interact_with_context(format!("delete wallet {address}"), move |conn| {
                Wallet::delete_by_address(&address, conn)
            })
            .await?;
        Ok(deleted > 0)
    }

    async fn position_counts(&self) -> Result<HashMap<String, i64>, DatabaseError> {
        let counts = self
            .pool
            .interact_with_context(
                "count positions by owner".to_string(),
                Position::counts_by_owner,
            )
            .await?;
        Ok(counts.into_iter().collect())
    }

    async fn count_positions_by_owner(&self, owner: &str) -> Result<i64, DatabaseError> {
        let owner = owner.to_owned();
        self.pool
            .interact_with_context(format!("count positions of {owner}"), move |conn| {
                Position::count_by_owner(&owner, conn)
            })
            .await
    }

    async fn find_position(&self, token_id: &str) -> Result<Option<Position>, DatabaseError> {
        let token_id = token_id.to_owned();
        self.pool
            .interact_with_context(format!("find position {token_id}"), move |conn| {
                Position::find_by_token_id(&token_id, conn).optional()
            })
            .await
    }

    async fn positions_by_owner(&self, owner: &str) -> Result<Vec<Position>, DatabaseError> {
        let owner = owner.to_owned();
        self.pool
            .interact_with_context(format!("find positions of {owner}"), move |conn| {
                Position::find_by_owner(&owner, conn)
            })
            .await
    }

    async fn all_positions(&self) -> Result<Vec<Position>, DatabaseError> {
        self.pool
            .interact_with_context("list positions".to_string(), Position::find_all)
            .await
    }

    async fn upsert_position(&self, position: NewPosition) -> Result<Position, DatabaseError> {
        self.pool
            .interact_with_context(format!("upsert position {}", position.token_id), move |conn| {
                Position::upsert(&position, conn)
            })
            .await
    }
}
