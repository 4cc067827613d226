use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use lp_db::models::normalize_address;

use crate::{
    AppState,
    dto::{ApiResponse, WalletView},
    errors::{ApiError, OrInternal},
};

const FAILED: &str = "Failed to retrieve wallet";

#[utoipa::path(
    get,
    path = "/api/wallets/{address}",
    tag = "Wallets",
    params(
        ("address" = String, Path, description = "Wallet address, any case")
    ),
    responses(
        (status = 200, description = "Wallet", body = WalletView),
        (status = 401, description = "Invalid or missing API key"),
        (status = 404, description = "Wallet not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_wallet(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let address = normalize_address(&address);

    let wallet = state
        .store
        .find_wallet(&address)
        .await
        .or_internal(FAILED)?
        .ok_or(ApiError::WalletNotFound)?;
    let position_count = state
        .store
        .count_positions_by_owner(&address)
        .await
        .or_internal(FAILED)?;

    Ok(Json(ApiResponse::ok(WalletView::new(wallet, position_count))))
}
