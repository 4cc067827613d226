pub mod positions;
pub mod wallets;

pub use positions::{get_aggregate_positions, get_position, list_positions};
pub use wallets::{create_wallet, delete_wallet, get_wallet, list_wallets, sync_wallet};
