use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use lp_db::models::normalize_address;

use crate::{
    AppState,
    dto::{ApiResponse, MessageResponse},
    errors::{ApiError, OrInternal},
};

const FAILED: &str = "Failed to delete wallet";

/// Stored positions of the wallet are kept.
#[utoipa::path(
    delete,
    path = "/api/wallets/{address}",
    tag = "Wallets",
    params(
        ("address" = String, Path, description = "Wallet address, any case")
    ),
    responses(
        (status = 200, description = "Wallet deleted", body = MessageResponse),
        (status = 401, description = "Invalid or missing API key"),
        (status = 404, description = "Wallet not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_wallet(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let address = normalize_address(&address);

    if !state
        .store
        .delete_wallet(&address)
        .await
        .or_internal(FAILED)?
    {
        return Err(ApiError::WalletNotFound);
    }

    tracing::info!(address = %address, "Wallet deleted");
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Wallet deleted successfully",
    ))))
}
