use axum::Json;
use axum::Router;
use axum::extract::{OriginalUri, State};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use utoipa::OpenApi as OpenApiT;
use utoipa_swagger_ui::SwaggerUi;

use crate::dto::HealthResponse;
use crate::errors::ApiError;
use crate::{AppState, handlers, middleware};

pub fn api_router<T: OpenApiT>(state: AppState) -> Router<AppState> {
    let open_api = T::openapi();

    let wallets_router = Router::new()
        .route("/", post(handlers::create_wallet).get(handlers::list_wallets))
        .route(
            "/{address}",
            get(handlers::get_wallet).delete(handlers::delete_wallet),
        )
        .route("/{address}/sync", post(handlers::sync_wallet));

    // "/aggregate" is a static segment and wins over "/{token_id}"
    let positions_router = Router::new()
        .route("/", get(handlers::list_positions))
        .route("/aggregate", get(handlers::get_aggregate_positions))
        .route("/{token_id}", get(handlers::get_position));

    // the key check wraps the fallback too, so unknown /api paths answer 401
    let protected_router = Router::new()
        .nest("/wallets", wallets_router)
        .nest("/positions", positions_router)
        .fallback(handler_404)
        .layer(from_fn_with_state(state.clone(), middleware::require_api_key));

    let production = state.settings.is_production();
    Router::new()
        .route("/health", get(health))
        .nest("/api", protected_router)
        .merge(SwaggerUi::new("/docs").url("/docs/openapi.json", open_api))
        .fallback(handler_404)
        .layer(CatchPanicLayer::custom(move |panic| {
            middleware::panic_response(production, panic)
        }))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        env!("CARGO_PKG_VERSION"),
        &state.settings.environment,
    ))
}

async fn handler_404(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::EndpointNotFound(uri.path().to_string())
}
