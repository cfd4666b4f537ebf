//! API documentation handlers
//!
//! Serves the OpenAPI document generated by `utoipa` together with Swagger UI
//! and ReDoc pages that render it.

use axum::{
    extract::State,
    response::{Html, Json},
};
use utoipa::OpenApi;

use crate::config::AppConfig;
use crate::health::{DatabaseHealth, HealthReport, PoolCount, PoolStats};
use crate::routes::home::{Endpoints, Welcome};
use crate::state::AppState;

pub const OPENAPI_PATH: &str = "/openapi.json";
pub const SWAGGER_PATH: &str = "/docs";
pub const REDOC_PATH: &str = "/redoc";

#[derive(OpenApi)]
#[openapi(
    paths(crate::routes::home::index, crate::routes::health::health),
    components(schemas(HealthReport, DatabaseHealth, PoolStats, PoolCount, Welcome, Endpoints)),
    tags(
        (name = "root", description = "Service information"),
        (name = "health", description = "Database-aware health check")
    )
)]
struct ApiDoc;

/// OpenAPI document for this deployment.
///
/// Health paths are declared relative to the API prefix and are moved under
/// the configured one here.
pub fn openapi_document(config: &AppConfig) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = config.app.name.clone();
    doc.info.version = config.app.version.clone();

    let prefix = config.http.api_prefix.as_str();
    let paths = std::mem::take(&mut doc.paths.paths);
    doc.paths.paths = paths
        .into_iter()
        .map(|(path, item)| {
            if path.starts_with("/health") {
                (format!("{}{}", prefix, path), item)
            } else {
                (path, item)
            }
        })
        .collect();
    doc
}

/// GET /openapi.json
pub async fn openapi_json(State(state): State<AppState>) -> Json<utoipa::openapi::OpenApi> {
    Json(openapi_document(&state.config))
}

/// GET /docs - Swagger UI
pub async fn swagger_ui(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title} - Swagger UI</title>
    <link rel="stylesheet" type="text/css"
          href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        SwaggerUIBundle({{
            url: '{spec}',
            dom_id: '#swagger-ui',
            presets: [
                SwaggerUIBundle.presets.apis,
                SwaggerUIBundle.SwaggerUIStandalonePreset
            ]
        }});
    </script>
</body>
</html>
"#,
        title = state.config.app.name,
        spec = OPENAPI_PATH,
    ))
}

/// GET /redoc - ReDoc
pub async fn redoc(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title} - ReDoc</title>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1">
</head>
<body>
    <redoc spec-url="{spec}"></redoc>
    <script src="https://cdn.jsdelivr.net/npm/redoc@2/bundles/redoc.standalone.js"></script>
</body>
</html>
"#,
        title = state.config.app.name,
        spec = OPENAPI_PATH,
    ))
}
