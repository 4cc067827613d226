use lp_types::ChainId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("provider not configured for chain {0}")]
    ProviderNotConfigured(ChainId),

    #[error("index not configured for chain {0}")]
    IndexNotConfigured(ChainId),

    #[error("{upstream} unavailable: {message}")]
    Unavailable {
        upstream: &'static str,
        message: String,
    },

    #[error("RPC call failed: {0}")]
    Rpc(String),

    #[error("failed to decode contract response: {0}")]
    Decode(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("index query failed: {0}")]
    Index(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl ChainError {
    pub fn unavailable(upstream: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            upstream,
            message: message.into(),
        }
    }
}
