use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use lp_db::models::NewWallet;
use lp_types::{validate_address, validate_address_checksum};
use serde_json::Value;

use crate::{
    AppState,
    dto::{ApiResponse, CreateWalletRequest, CreatedWallet},
    errors::{ApiError, OrInternal},
};

const FAILED: &str = "Failed to create wallet";

/// Empty values (`null`, `""`, `false`, `0`) count as missing. Any other
/// non-string is an invalid address.
fn requested_address(address: Option<Value>) -> Result<String, ApiError> {
    match address.unwrap_or(Value::Null) {
        Value::Null | Value::Bool(false) => Err(ApiError::MissingAddress),
        Value::String(address) if address.is_empty() => Err(ApiError::MissingAddress),
        Value::String(address) => Ok(address),
        Value::Number(n) if n.as_u64() == Some(0) => Err(ApiError::MissingAddress),
        _ => Err(ApiError::InvalidAddress),
    }
}

#[utoipa::path(
    post,
    path = "/api/wallets",
    tag = "Wallets",
    request_body = CreateWalletRequest,
    responses(
        (status = 201, description = "Wallet registered; initial sync runs in the background", body = CreatedWallet),
        (status = 400, description = "Missing or invalid address"),
        (status = 401, description = "Invalid or missing API key"),
        (status = 409, description = "Wallet already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_wallet(
    State(state): State<AppState>,
    payload: Result<Json<CreateWalletRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::server_error(&state.settings, e.body_text()))?;

    let address = requested_address(request.address)?;

    let valid = if state.settings.strict_checksum {
        validate_address_checksum(&address)
    } else {
        validate_address(&address)
    };
    if !valid {
        return Err(ApiError::InvalidAddress);
    }

    let new_wallet = NewWallet::new(&address, request.label, request.tags);
    if state
        .store
        .find_wallet(&new_wallet.address)
        .await
        .or_internal(FAILED)?
        .is_some()
    {
        return Err(ApiError::WalletExists);
    }

    let wallet = state.store.create_wallet(new_wallet).await.map_err(|e| {
        // lost a race with a concurrent registration of the same address
        if e.is_unique_violation() {
            ApiError::WalletExists
        } else {
            tracing::error!(error = %e, "{FAILED}");
            ApiError::Internal(FAILED)
        }
    })?;

    tracing::info!(address = %wallet.address, "Wallet registered");
    state
        .background
        .spawn_wallet_sync(&wallet.address, state.settings.default_chain);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(CreatedWallet::from(wallet))),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_requested_address_shapes() {
        let valid = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
        assert_eq!(requested_address(Some(json!(valid))), Ok(valid.to_string()));

        for missing in [None, Some(json!(null)), Some(json!("")), Some(json!(false)), Some(json!(0))] {
            assert_eq!(requested_address(missing), Err(ApiError::MissingAddress));
        }
        for invalid in [json!(5), json!(true), json!(["0xabc"]), json!({ "address": valid })] {
            assert_eq!(requested_address(Some(invalid)), Err(ApiError::InvalidAddress));
        }
    }
}
