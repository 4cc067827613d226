// `wallets.tags` elements are declared non-null: the column carries a CHECK
// rejecting NULL elements, so keep that edit when regenerating.

diesel::table! {
    positions (token_id) {
        #[max_length = 78]
        token_id -> Varchar,
        #[max_length = 42]
        owner -> Varchar,
        #[max_length = 66]
        pool_id -> Varchar,
        #[max_length = 42]
        token0_address -> Varchar,
        token0_symbol -> Text,
        token0_decimals -> Int4,
        #[max_length = 42]
        token1_address -> Varchar,
        token1_symbol -> Text,
        token1_decimals -> Int4,
        fee -> Int4,
        tick_spacing -> Int4,
        #[max_length = 42]
        hook_address -> Nullable<Varchar>,
        #[max_length = 78]
        liquidity -> Varchar,
        tick_lower -> Int4,
        tick_upper -> Int4,
        #[max_length = 78]
        fee_growth_inside0_last_x128 -> Varchar,
        #[max_length = 78]
        fee_growth_inside1_last_x128 -> Varchar,
        #[max_length = 78]
        tokens_owed0 -> Varchar,
        #[max_length = 78]
        tokens_owed1 -> Varchar,
        has_subscriber -> Bool,
        chain_id -> Int8,
        created_at -> Timestamptz,
        last_synced_at -> Timestamptz,
    }
}

diesel::table! {
    wallets (id) {
        id -> Uuid,
        #[max_length = 42]
        address -> Varchar,
        #[max_length = 255]
        label -> Nullable<Varchar>,
        tags -> Nullable<Array<Text>>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(positions, wallets,);

#[cfg(test)]
mod tests {
    const CREATE_TABLES: &str =
        include_str!("../migrations/2025-06-01-000000_create_wallets_positions/up.sql");

    #[test]
    fn test_tag_elements_are_constrained_non_null() {
        let tags_column = CREATE_TABLES
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with("tags "))
            .unwrap();
        assert!(tags_column.contains("CHECK (array_position(tags, NULL) IS NULL)"));
    }
}
