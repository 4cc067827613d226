use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::wallets;

/// Wallet and position owner addresses are always stored lower-cased.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = wallets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Wallet {
    pub id: Uuid,
    pub address: String,
    pub label: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = wallets)]
pub struct NewWallet {
    pub address: String,
    pub label: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl NewWallet {
    pub fn new(address: &str, label: Option<String>, tags: Option<Vec<String>>) -> Self {
        Self {
            address: normalize_address(address),
            label,
            tags,
        }
    }
}

impl Wallet {
    pub fn find_by_address(address: &str, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        wallets::table
            .filter(wallets::address.eq(address))
            .select(Self::as_select())
            .first(conn)
    }

    pub fn find_all(conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        wallets::table
            .order(wallets::created_at.asc())
            .select(Self::as_select())
            .load(conn)
    }

    pub fn create(new_wallet: &NewWallet, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::insert_into(wallets::table)
            .values(new_wallet)
            .returning(Self::as_returning())
            .get_result(conn)
    }

    /// Returns the number of deleted rows.
    pub fn delete_by_address(address: &str, conn: &mut diesel::PgConnection) -> QueryResult<usize> {
        diesel::delete(wallets::table.filter(wallets::address.eq(address))).execute(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_wallet_lowercases_address() {
        let wallet = NewWallet::new(
            "0xABCDEF0123456789ABCDEF0123456789ABCDEF01",
            Some("main".to_string()),
            None,
        );
        assert_eq!(wallet.address, "0xabcdef0123456789abcdef0123456789abcdef01");
        assert_eq!(wallet.label.as_deref(), Some("main"));
    }
}
