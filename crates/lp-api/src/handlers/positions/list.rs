use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    AppState,
    dto::{ApiResponse, PositionList, PositionSummary, PositionsQuery},
    errors::{ApiError, OrInternal},
};

const FAILED: &str = "Failed to retrieve positions";

#[utoipa::path(
    get,
    path = "/api/positions",
    tag = "Positions",
    params(
        ("wallet" = Option<String>, Query, description = "Only positions owned by this address")
    ),
    responses(
        (status = 200, description = "Position details with summary", body = PositionList),
        (status = 401, description = "Invalid or missing API key"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_positions(
    State(state): State<AppState>,
    Query(query): Query<PositionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let wallet = query.wallet.filter(|wallet| !wallet.is_empty());

    let positions = match &wallet {
        Some(wallet) => state.details.get_wallet_positions(wallet).await,
        None => state.details.get_all_positions().await,
    }
    .or_internal(FAILED)?;

    let summary = PositionSummary::from_positions(&positions);
    Ok(Json(ApiResponse::ok(PositionList {
        wallet: wallet.unwrap_or_else(|| "all".to_string()),
        positions,
        summary,
    })))
}
