use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    AppState,
    dto::{ApiResponse, WalletList, WalletView},
    errors::{ApiError, OrInternal},
};

const FAILED: &str = "Failed to retrieve wallets";

#[utoipa::path(
    get,
    path = "/api/wallets",
    tag = "Wallets",
    responses(
        (status = 200, description = "All tracked wallets with their position counts", body = WalletList),
        (status = 401, description = "Invalid or missing API key"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_wallets(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let (wallets, counts) = tokio::try_join!(state.store.list_wallets(), state.store.position_counts())
        .or_internal(FAILED)?;

    let wallets = wallets
        .into_iter()
        .map(|wallet| {
            let count = counts.get(&wallet.address).copied().unwrap_or_default();
            WalletView::new(wallet, count)
        })
        .collect();

    Ok(Json(ApiResponse::ok(WalletList { wallets })))
}
