use anyhow::Result;
use serde_json::to_string_pretty;
use std::path::PathBuf;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::openapi::{ServerBuilder, ServerVariableBuilder};
use utoipauto::utoipauto;

use crate::middleware::API_KEY_HEADER;

pub struct ServerAddon;

impl Modify for ServerAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let server_variable = ServerVariableBuilder::new().default_value("3000").build();
        openapi.servers = Some(vec![
            ServerBuilder::new()
                .url("http://localhost:{port}")
                .parameter("port", server_variable)
                .build(),
        ]);
    }
}

pub struct ApiKeyAddon;

impl Modify for ApiKeyAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_KEY_HEADER))),
        );
    }
}

#[utoipauto(paths = "./crates/lp-api/src/")]
#[derive(OpenApi)]
#[openapi(
    modifiers(&ServerAddon, &ApiKeyAddon),
    security(("api_key" = [])),
    tags(
        (name = "lp-tracker", description = "Uniswap V4 liquidity position tracker"),
        (name = "Wallets", description = "Tracked wallet management"),
        (name = "Positions", description = "Live position details and aggregates"),
        (name = "Health", description = "Liveness probe"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    pub fn generate_openapi_json(output_path: PathBuf) -> Result<()> {
        let openapi = Self::openapi();
        let json = to_string_pretty(&openapi)?;

        let file_path = output_path.join("openapi.json");

        tracing::info!("Saving OpenAPI specs to {}...", file_path.display());

        std::fs::write(&file_path, json)?;
        tracing::info!("OpenAPI specs saved!");
        Ok(())
    }
}
