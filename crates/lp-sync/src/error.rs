use lp_chain::ChainError;
use lp_db::DatabaseError;
use lp_types::UnsupportedChain;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Store(#[from] DatabaseError),

    #[error("position {token_id} has tick_lower {tick_lower} above tick_upper {tick_upper}")]
    InvalidTickRange {
        token_id: String,
        tick_lower: i32,
        tick_upper: i32,
    },
}

#[derive(Debug, Error)]
pub enum DetailsError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Store(#[from] DatabaseError),

    #[error("stored position uses {0}")]
    UnsupportedChain(#[from] UnsupportedChain),

    #[error("cannot format {field} amount {value:?}: {reason}")]
    InvalidAmount {
        field: &'static str,
        value: String,
        reason: String,
    },
}
