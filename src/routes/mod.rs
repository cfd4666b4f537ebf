//! HTTP route handlers.
//!
//! The router mounts the welcome route at `/`, the API documentation at
//! `/openapi.json`, `/docs` and `/redoc`, and the health route under the
//! configured API prefix. Every request passes through the request-ID
//! middleware and the CORS layer; unknown paths get a JSON 404.

pub mod docs;
pub mod health;
pub mod home;

use axum::{http::Uri, middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{HttpServerConfig, CACHE_CONTROL_HEALTH};
use crate::error::AppError;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Build the CORS layer from the configured origins.
///
/// A `*` entry allows any origin without credentials. An explicit list allows
/// credentials and mirrors the requested method and headers, since wildcards
/// cannot be combined with credentials.
pub fn cors_layer(http: &HttpServerConfig) -> CorsLayer {
    if http.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = http
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Creates the Axum router with all routes and layers.
pub fn create_router(state: AppState) -> Router {
    // Health check - no caching, always fresh for uptime monitors
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/", get(health::health))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HEALTH),
        ));

    let prefix = state.config.http.api_prefix.as_str();
    let api_routes = if prefix.is_empty() {
        health_routes
    } else {
        Router::new().nest(prefix, health_routes)
    };

    let cors = cors_layer(&state.config.http);

    Router::new()
        .route("/", get(home::index))
        .route(docs::OPENAPI_PATH, get(docs::openapi_json))
        .route(docs::SWAGGER_PATH, get(docs::swagger_ui))
        .route(docs::REDOC_PATH, get(docs::redoc))
        .merge(api_routes)
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
