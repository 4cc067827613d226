use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::positions;

/// A synced position NFT. Big integer fields are decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = positions)]
#[diesel(primary_key(token_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Position {
    pub token_id: String,
    pub owner: String,
    pub pool_id: String,
    pub token0_address: String,
    pub token0_symbol: String,
    pub token0_decimals: i32,
    pub token1_address: String,
    pub token1_symbol: String,
    pub token1_decimals: i32,
    pub fee: i32,
    pub tick_spacing: i32,
    pub hook_address: Option<String>,
    pub liquidity: String,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub fee_growth_inside0_last_x128: String,
    pub fee_growth_inside1_last_x128: String,
    pub tokens_owed0: String,
    pub tokens_owed1: String,
    pub has_subscriber: bool,
    pub chain_id: i64,
    pub created_at: DateTime<Utc>,
    pub last_synced_at: DateTime<Utc>,
}

/// Full set of synced columns. Used both for the insert and, on conflict, as
/// the changeset that overwrites an existing row, so `None` must clear a column.
#[derive(Debug, Clone, Serialize, Deserialize, Insertable, AsChangeset)]
#[diesel(table_name = positions)]
#[diesel(primary_key(token_id))]
#[diesel(treat_none_as_null = true)]
pub struct NewPosition {
    pub token_id: String,
    pub owner: String,
    pub pool_id: String,
    pub token0_address: String,
    pub token0_symbol: String,
    pub token0_decimals: i32,
    pub token1_address: String,
    pub token1_symbol: String,
    pub token1_decimals: i32,
    pub fee: i32,
    pub tick_spacing: i32,
    pub hook_address: Option<String>,
    pub liquidity: String,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub fee_growth_inside0_last_x128: String,
    pub fee_growth_inside1_last_x128: String,
    pub tokens_owed0: String,
    pub tokens_owed1: String,
    pub has_subscriber: bool,
    pub chain_id: i64,
    pub last_synced_at: DateTime<Utc>,
}

impl Position {
    pub fn find_by_token_id(token_id: &str, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        positions::table
            .find(token_id)
            .select(Self::as_select())
            .first(conn)
    }

    pub fn find_by_owner(owner: &str, conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        positions::table
            .filter(positions::owner.eq(owner))
            .order(positions::created_at.asc())
            .select(Self::as_select())
            .load(conn)
    }

    pub fn find_all(conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        positions::table
            .order(positions::created_at.asc())
            .select(Self::as_select())
            .load(conn)
    }

    pub fn count_by_owner(owner: &str, conn: &mut diesel::PgConnection) -> QueryResult<i64> {
        positions::table
            .filter(positions::owner.eq(owner))
            .count()
            .get_result(conn)
    }

    /// Position count per owner address.
    pub fn counts_by_owner(conn: &mut diesel::PgConnection) -> QueryResult<Vec<(String, i64)>> {
        positions::table
            .group_by(positions::owner)
            .select((positions::owner, count_star()))
            .load(conn)
    }

    /// Inserts the position, or overwrites every synced column of the existing
    /// row. `created_at` is left untouched on overwrite.
    pub fn upsert(new_position: &NewPosition, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::insert_into(positions::table)
            .values(new_position)
            .on_conflict(positions::token_id)
            .do_update()
            .set(new_position)
            .returning(Self::as_returning())
            .get_result(conn)
    }
}

impl NewPosition {
    /// Materializes the row the store would hold after an upsert.
    pub fn into_position(self, created_at: DateTime<Utc>) -> Position {
        Position {
            token_id: self.token_id,
            owner: self.owner,
            pool_id: self.pool_id,
            token0_address: self.token0_address,
            token0_symbol: self.token0_symbol,
            token0_decimals: self.token0_decimals,
            token1_address: self.token1_address,
            token1_symbol: self.token1_symbol,
            token1_decimals: self.token1_decimals,
            fee: self.fee,
            tick_spacing: self.tick_spacing,
            hook_address: self.hook_address,
            liquidity: self.liquidity,
            tick_lower: self.tick_lower,
            tick_upper: self.tick_upper,
            fee_growth_inside0_last_x128: self.fee_growth_inside0_last_x128,
            fee_growth_inside1_last_x128: self.fee_growth_inside1_last_x128,
            tokens_owed0: self.tokens_owed0,
            tokens_owed1: self.tokens_owed1,
            has_subscriber: self.has_subscriber,
            chain_id: self.chain_id,
            created_at,
            last_synced_at: self.last_synced_at,
        }
    }
}
