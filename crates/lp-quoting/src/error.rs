use lp_types::ChainId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PriceError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("no USD price returned for {token} on {chain}")]
    MissingPrice { token: String, chain: ChainId },

    #[error("price source unavailable: {0}")]
    Unavailable(String),
}
