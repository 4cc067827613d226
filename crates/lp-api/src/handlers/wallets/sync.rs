use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use lp_db::models::normalize_address;
use lp_sync::SyncTrigger;
use lp_types::ChainId;

use crate::{
    AppState,
    dto::{ApiResponse, MessageResponse, SyncQuery},
    errors::{ApiError, OrInternal},
};

const FAILED: &str = "Failed to sync positions";

fn parse_chain(raw: Option<&str>, default: ChainId) -> Result<ChainId, ApiError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    raw.trim()
        .parse::<u64>()
        .ok()
        .and_then(|id| ChainId::try_from(id).ok())
        .ok_or_else(|| ApiError::InvalidChain(raw.to_string()))
}

#[utoipa::path(
    post,
    path = "/api/wallets/{address}/sync",
    tag = "Wallets",
    params(
        ("address" = String, Path, description = "Wallet address, any case"),
        ("chainId" = Option<u64>, Query, description = "1, 8453 or 42161; defaults to the configured sync chain")
    ),
    responses(
        (status = 200, description = "Positions synced", body = MessageResponse),
        (status = 400, description = "Unsupported chain id"),
        (status = 401, description = "Invalid or missing API key"),
        (status = 404, description = "Wallet not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn sync_wallet(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<SyncQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let address = normalize_address(&address);
    let chain = parse_chain(query.chain_id.as_deref(), state.settings.default_chain)?;

    state
        .store
        .find_wallet(&address)
        .await
        .or_internal(FAILED)?
        .ok_or(ApiError::WalletNotFound)?;

    state
        .syncer
        .sync_wallet(&address, chain, SyncTrigger::Manual)
        .await
        .or_internal(FAILED)?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Positions synced successfully",
    ))))
}
