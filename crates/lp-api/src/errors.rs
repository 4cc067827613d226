use std::fmt::Display;

use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::ApiSettings;
use crate::dto::ApiResponse;

const SUPPRESSED_DETAIL: &str = "Internal server error";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Wallet address is required")]
    MissingAddress,
    #[error("Invalid Ethereum address format")]
    InvalidAddress,
    #[error("Unsupported chain id: {0}")]
    InvalidChain(String),
    #[error("Wallet already exists")]
    WalletExists,
    #[error("Wallet not found")]
    WalletNotFound,
    #[error("Position not found")]
    PositionNotFound,
    #[error("Invalid or missing API key")]
    Unauthorized,
    #[error("Endpoint not found")]
    EndpointNotFound(String),
    #[error("Too many requests")]
    RateLimited,
    #[error("Request timed out")]
    Timeout,
    /// Handled failure of a known operation; the message names the operation.
    #[error("{0}")]
    Internal(&'static str),
    /// Unhandled failure; the detail is already suppressed when required.
    #[error("{0}")]
    InternalServerError(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingAddress | Self::InvalidAddress | Self::InvalidChain(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::WalletNotFound | Self::PositionNotFound | Self::EndpointNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::WalletExists => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Internal(_) | Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingAddress => "MISSING_ADDRESS",
            Self::InvalidAddress => "INVALID_ADDRESS",
            Self::InvalidChain(_) => "INVALID_CHAIN",
            Self::WalletExists => "WALLET_EXISTS",
            Self::WalletNotFound => "WALLET_NOT_FOUND",
            Self::PositionNotFound => "POSITION_NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::EndpointNotFound(_) => "NOT_FOUND",
            Self::RateLimited => "RATE_LIMITED",
            Self::Timeout => "REQUEST_TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Unhandled failure, with `detail` hidden from clients in production.
    pub fn server_error(settings: &ApiSettings, detail: impl Display) -> Self {
        tracing::error!("Error: {detail}");
        if settings.is_production() {
            Self::InternalServerError(SUPPRESSED_DETAIL.to_string())
        } else {
            Self::InternalServerError(detail.to_string())
        }
    }
}

/// Extension trait mapping any failure to the `INTERNAL_ERROR` of the
/// operation being served, logging the cause.
pub trait OrInternal<T> {
    fn or_internal(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T, E: Display> OrInternal<T> for Result<T, E> {
    fn or_internal(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| {
            tracing::error!(error = %e, "{message}");
            ApiError::Internal(message)
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let path = match &self {
            Self::EndpointNotFound(path) => Some(path.clone()),
            _ => None,
        };
        let response: ApiResponse<()> = ApiResponse::error(self.code(), self.to_string(), path);
        (status, Json(response)).into_response()
    }
}
