pub mod position;
pub mod wallet;

pub use position::{NewPosition, Position};
pub use wallet::{NewWallet, Wallet, normalize_address};
