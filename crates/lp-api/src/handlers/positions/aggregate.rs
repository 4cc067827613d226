use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    AppState,
    dto::{AggregateView, ApiResponse},
    errors::{ApiError, OrInternal},
};

#[utoipa::path(
    get,
    path = "/api/positions/aggregate",
    tag = "Positions",
    responses(
        (status = 200, description = "Totals across all wallets, grouped by token pair", body = AggregateView),
        (status = 401, description = "Invalid or missing API key"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_aggregate_positions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let positions = state
        .details
        .get_all_positions()
        .await
        .or_internal("Failed to retrieve aggregate positions")?;

    Ok(Json(ApiResponse::ok(AggregateView::from_positions(&positions))))
}
