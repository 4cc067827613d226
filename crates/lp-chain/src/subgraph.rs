use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use lp_types::{ChainId, validate_address};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::ChainError;

/// Owner to token-id lookup. The position manager has no enumeration, so this
/// goes through an external index.
#[async_trait]
pub trait PositionIndex: Send + Sync {
    async fn get_token_ids_by_owner(
        &self,
        owner: &str,
        chain: ChainId,
    ) -> Result<Vec<String>, ChainError>;
}

/// Upper bound on token ids returned for one owner. No cursor pagination.
pub const POSITIONS_PAGE_SIZE: usize = 1000;

pub const DEFAULT_GRAPH_API_URL: &str = "https://gateway.thegraph.com/api";
pub const DEFAULT_ETHEREUM_SUBGRAPH_ID: &str = "DiYPVdygkfjDWhbxGSqAQxwBKmfKnkWQojqeM2rkLb3G";
pub const DEFAULT_BASE_SUBGRAPH_ID: &str = "2L6yxqUZ7dT6GWoTy9qxNBkf9kEk65me3XPMvbGsmJUZ";

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<PositionsData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct PositionsData {
    positions: Vec<IndexedPosition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexedPosition {
    token_id: String,
}

pub struct SubgraphIndex {
    http_client: Client,
    api_url: String,
    api_key: Option<String>,
    subgraph_ids: HashMap<ChainId, String>,
}

impl SubgraphIndex {
    pub fn new(
        api_url: &str,
        api_key: Option<String>,
        subgraph_ids: HashMap<ChainId, String>,
        timeout: Duration,
    ) -> Result<Self, ChainError> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            subgraph_ids,
        })
    }

    fn endpoint(&self, chain: ChainId) -> Result<String, ChainError> {
        let subgraph_id = self
            .subgraph_ids
            .get(&chain)
            .ok_or(ChainError::IndexNotConfigured(chain))?;

        Ok(match &self.api_key {
            Some(key) => format!("{}/{key}/subgraphs/id/{subgraph_id}", self.api_url),
            None => format!("{}/subgraphs/id/{subgraph_id}", self.api_url),
        })
    }
}

fn positions_query(owner: &str) -> String {
    format!(
        "{{ positions(where: {{owner: \"{}\"}}, first: {POSITIONS_PAGE_SIZE}) {{ tokenId }} }}",
        owner.to_ascii_lowercase()
    )
}

fn token_ids_from_response(response: GraphQlResponse) -> Result<Vec<String>, ChainError> {
    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(ChainError::Index(messages.join("; ")));
    }

    let data = response
        .data
        .ok_or_else(|| ChainError::Index("response carried no data".to_string()))?;

    Ok(data.positions.into_iter().map(|p| p.token_id).collect())
}

#[async_trait]
impl PositionIndex for SubgraphIndex {
    async fn get_token_ids_by_owner(
        &self,
        owner: &str,
        chain: ChainId,
    ) -> Result<Vec<String>, ChainError> {
        // the owner is spliced into the query text
        if !validate_address(owner) {
            return Err(ChainError::InvalidInput(format!("owner address {owner}")));
        }
        let endpoint = self.endpoint(chain)?;

        let response = self
            .http_client
            .post(&endpoint)
            .json(&json!({ "query": positions_query(owner) }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ChainError::unavailable("position index", e.to_string())
                } else {
                    ChainError::HttpError(e)
                }
            })?
            .error_for_status()?
            .json::<GraphQlResponse>()
            .await?;

        let token_ids = token_ids_from_response(response)?;
        if token_ids.len() >= POSITIONS_PAGE_SIZE {
            tracing::warn!(
                owner = %owner,
                chain = %chain,
                "Position index returned a full page, later positions are not tracked"
            );
        }
        Ok(token_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(api_key: Option<&str>) -> SubgraphIndex {
        SubgraphIndex::new(
            "https://gateway.thegraph.com/api/",
            api_key.map(str::to_string),
            HashMap::from([(ChainId::Ethereum, DEFAULT_ETHEREUM_SUBGRAPH_ID.to_string())]),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            index(Some("key")).endpoint(ChainId::Ethereum).unwrap(),
            "https://gateway.thegraph.com/api/key/subgraphs/id/DiYPVdygkfjDWhbxGSqAQxwBKmfKnkWQojqeM2rkLb3G"
        );
        assert_eq!(
            index(None).endpoint(ChainId::Ethereum).unwrap(),
            "https://gateway.thegraph.com/api/subgraphs/id/DiYPVdygkfjDWhbxGSqAQxwBKmfKnkWQojqeM2rkLb3G"
        );
        assert!(matches!(
            index(None).endpoint(ChainId::Base),
            Err(ChainError::IndexNotConfigured(ChainId::Base))
        ));
    }

    #[test]
    fn test_positions_query_lowercases_owner() {
        assert_eq!(
            positions_query("0xABCDEF0123456789ABCDEF0123456789ABCDEF01"),
            "{ positions(where: {owner: \"0xabcdef0123456789abcdef0123456789abcdef01\"}, first: 1000) { tokenId } }"
        );
    }

    #[test]
    fn test_token_ids_from_response() {
        let ok: GraphQlResponse = serde_json::from_str(
            r#"{"data": {"positions": [{"tokenId": "17"}, {"tokenId": "4"}]}}"#,
        )
        .unwrap();
        assert_eq!(token_ids_from_response(ok).unwrap(), vec!["17", "4"]);

        let failed: GraphQlResponse =
            serde_json::from_str(r#"{"errors": [{"message": "indexer unavailable"}]}"#).unwrap();
        assert!(matches!(
            token_ids_from_response(failed),
            Err(ChainError::Index(msg)) if msg == "indexer unavailable"
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_chain_fails_without_request() {
        let err = index(Some("key"))
            .get_token_ids_by_owner("0xabcdef0123456789abcdef0123456789abcdef01", ChainId::Arbitrum)
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::IndexNotConfigured(ChainId::Arbitrum)));

        let err = index(Some("key"))
            .get_token_ids_by_owner("0xabc\"}) { evil }", ChainId::Ethereum)
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::InvalidInput(_)));
    }
}
