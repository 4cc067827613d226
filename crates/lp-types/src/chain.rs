use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unsupported chain id {0}")]
pub struct UnsupportedChain(pub u64);

/// Networks the tracker knows how to read from.
///
/// Serialized as the numeric EVM chain id so that stored records and API
/// payloads stay compatible with what wallets and explorers display.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Display,
    AsRefStr,
    EnumString,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(try_from = "u64", into = "u64")]
pub enum ChainId {
    #[default]
    Ethereum,
    Base,
    Arbitrum,
}

impl ChainId {
    pub const ALL: [Self; 3] = [Self::Ethereum, Self::Base, Self::Arbitrum];

    pub const fn id(self) -> u64 {
        match self {
            Self::Ethereum => 1,
            Self::Base => 8453,
            Self::Arbitrum => 42161,
        }
    }

    /// Platform slug used by the CoinGecko token price endpoint.
    pub const fn coingecko_platform(self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Base => "base",
            Self::Arbitrum => "arbitrum-one",
        }
    }

    /// CoinGecko coin id of the gas token. All supported networks settle in ETH.
    pub const fn native_coin_id(self) -> &'static str {
        match self {
            Self::Ethereum | Self::Base | Self::Arbitrum => "ethereum",
        }
    }
}

impl TryFrom<u64> for ChainId {
    type Error = UnsupportedChain;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|chain| chain.id() == value)
            .ok_or(UnsupportedChain(value))
    }
}

impl TryFrom<i64> for ChainId {
    type Error = UnsupportedChain;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let id = u64::try_from(value).map_err(|_| UnsupportedChain(0))?;
        Self::try_from(id)
    }
}

impl From<ChainId> for u64 {
    fn from(chain: ChainId) -> Self {
        chain.id()
    }
}

impl From<ChainId> for i64 {
    fn from(chain: ChainId) -> Self {
        chain.id() as Self
    }
}
