use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use lp_types::PositionDetails;

use crate::{
    AppState,
    dto::ApiResponse,
    errors::{ApiError, OrInternal},
};

#[utoipa::path(
    get,
    path = "/api/positions/{token_id}",
    tag = "Positions",
    params(
        ("token_id" = String, Path, description = "Position NFT token id")
    ),
    responses(
        (status = 200, description = "Live position details", body = PositionDetails),
        (status = 401, description = "Invalid or missing API key"),
        (status = 404, description = "Position not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_position(
    State(state): State<AppState>,
    Path(token_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let details = state
        .details
        .get_position_details(&token_id)
        .await
        .or_internal("Failed to retrieve position")?
        .ok_or(ApiError::PositionNotFound)?;

    Ok(Json(ApiResponse::ok(details)))
}
