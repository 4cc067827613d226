use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use lp_types::{ChainId, TokenInfo};
use reqwest::Client;

use crate::{PriceError, PriceSource};

/// Simple-price response: `{ "<id or address>": { "usd": 1.0 } }`.
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

const VS_CURRENCY: &str = "usd";

pub struct CoinGeckoSource {
    http_client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl CoinGeckoSource {
    pub const DEFAULT_API_URL: &'static str = "https://api.coingecko.com/api/v3";
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(api_url: &str, api_key: Option<String>) -> Result<Self, PriceError> {
        let http_client = Client::builder().timeout(Self::REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn token_price_url(&self, chain: ChainId, token: &str) -> String {
        format!(
            "{}/simple/token_price/{}?contract_addresses={token}&vs_currencies={VS_CURRENCY}",
            self.api_url,
            chain.coingecko_platform(),
        )
    }

    fn native_price_url(&self, chain: ChainId) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies={VS_CURRENCY}",
            self.api_url,
            chain.native_coin_id(),
        )
    }
}

fn extract_usd_price(
    body: &SimplePriceResponse,
    key: &str,
    chain: ChainId,
) -> Result<f64, PriceError> {
    body.get(key)
        .and_then(|quotes| quotes.get(VS_CURRENCY))
        .copied()
        .filter(|price| price.is_finite() && *price >= 0.0)
        .ok_or_else(|| PriceError::MissingPrice {
            token: key.to_string(),
            chain,
        })
}

#[async_trait]
impl PriceSource for CoinGeckoSource {
    async fn fetch_usd_price(&self, token: &str, chain: ChainId) -> Result<f64, PriceError> {
        // the zero address stands for the gas token, which has no contract entry
        let (url, key) = if TokenInfo::is_native_address(token) {
            (
                self.native_price_url(chain),
                chain.native_coin_id().to_string(),
            )
        } else {
            (self.token_price_url(chain, token), token.to_string())
        };

        let mut request = self.http_client.get(&url);
        if let Some(api_key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", api_key);
        }

        let body = request
            .send()
            .await?
            .error_for_status()?
            .json::<SimplePriceResponse>()
            .await?;

        extract_usd_price(&body, &key, chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let source = CoinGeckoSource::new("https://api.coingecko.com/api/v3/", None).unwrap();
        assert_eq!(
            source.token_price_url(ChainId::Arbitrum, "0xaf88d065e77c8cc2239327c5edb3a432268e5831"),
            "https://api.coingecko.com/api/v3/simple/token_price/arbitrum-one?contract_addresses=0xaf88d065e77c8cc2239327c5edb3a432268e5831&vs_currencies=usd"
        );
        assert_eq!(
            source.native_price_url(ChainId::Base),
            "https://api.coingecko.com/api/v3/simple/price?ids=ethereum&vs_currencies=usd"
        );
    }

    #[test]
    fn test_extract_usd_price() {
        let body: SimplePriceResponse = serde_json::from_str(
            r#"{"0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48": {"usd": 0.9998}}"#,
        )
        .unwrap();
        let price = extract_usd_price(
            &body,
            "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
            ChainId::Ethereum,
        )
        .unwrap();
        assert!((price - 0.9998).abs() < f64::EPSILON);

        let empty: SimplePriceResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            extract_usd_price(&empty, "0xdead", ChainId::Ethereum),
            Err(PriceError::MissingPrice { .. })
        ));
    }
}
