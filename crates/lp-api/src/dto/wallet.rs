use chrono::{DateTime, Utc};
use lp_db::models::Wallet;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateWalletRequest {
    /// Kept untyped so that a non-string address is reported as invalid
    /// instead of failing the whole body.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub address: Option<serde_json::Value>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedWallet {
    pub id: Uuid,
    pub address: String,
    pub label: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl From<Wallet> for CreatedWallet {
    fn from(wallet: Wallet) -> Self {
        Self {
            id: wallet.id,
            address: wallet.address,
            label: wallet.label,
            tags: wallet.tags,
            created_at: wallet.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletView {
    pub id: Uuid,
    pub address: String,
    pub label: Option<String>,
    pub tags: Option<Vec<String>>,
    pub position_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WalletView {
    pub fn new(wallet: Wallet, position_count: i64) -> Self {
        Self {
            id: wallet.id,
            address: wallet.address,
            label: wallet.label,
            tags: wallet.tags,
            position_count,
            created_at: wallet.created_at,
            updated_at: wallet.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletList {
    pub wallets: Vec<WalletView>,
}

/// Query parameters for the manual sync endpoint
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncQuery {
    /// Kept as text so a malformed value maps to `INVALID_CHAIN`.
    pub chain_id: Option<String>,
}
