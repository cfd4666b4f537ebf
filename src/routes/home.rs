//! Root welcome route.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::docs;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Welcome {
    pub app_name: String,
    pub version: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Endpoints {
    #[schema(example = "/api/health")]
    pub health: String,
    #[schema(example = "/docs")]
    pub swagger: String,
    #[schema(example = "/redoc")]
    pub redoc: String,
}

/// Describe the service and where its endpoints live.
#[utoipa::path(
    get,
    path = "/",
    tag = "root",
    responses(
        (status = 200, description = "Service name and endpoint map", body = ApiResponse<Welcome>)
    )
)]
pub async fn index(State(state): State<AppState>) -> Json<ApiResponse<Welcome>> {
    let app = &state.config.app;
    let welcome = Welcome {
        app_name: app.name.clone(),
        version: app.version.clone(),
        endpoints: Endpoints {
            health: format!("{}/health", state.config.http.api_prefix),
            swagger: docs::SWAGGER_PATH.to_string(),
            redoc: docs::REDOC_PATH.to_string(),
        },
    };
    Json(ApiResponse::success(format!("Welcome to {}", app.name), welcome))
}
