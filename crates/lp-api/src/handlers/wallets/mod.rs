pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod sync;

pub use create::create_wallet;
pub use delete::delete_wallet;
pub use get::get_wallet;
pub use list::list_wallets;
pub use sync::sync_wallet;
