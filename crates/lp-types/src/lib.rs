pub mod address;
pub mod chain;
pub mod details;
pub mod position_info;

pub use address::{ZERO_ADDRESS, to_checksum_address, validate_address, validate_address_checksum};
pub use chain::{ChainId, UnsupportedChain};
pub use details::{
    PoolView, PositionDetails, PositionValue, TokenRef, UnclaimedFees, is_in_range,
};
pub use position_info::{PositionInfo, TokenInfo};
