//! Health check endpoint.
//!
//! Runs the database probe and wraps the report in the response envelope. The
//! status code is 200 in both outcomes; callers read `success` and
//! `data.database.connected` to tell them apart.

use axum::{extract::State, Json};

use crate::health::{HealthReport, ProbeOutcome};
use crate::response::ApiResponse;
use crate::state::AppState;

pub const UNHEALTHY_MESSAGE: &str = "Database connection failed - service unhealthy";

/// Health check handler.
#[utoipa::path(
    get,
    path = "/health/",
    tag = "health",
    responses(
        (
            status = 200,
            description = "Probe result; `success` is false when the database is unreachable",
            body = ApiResponse<HealthReport>
        )
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthReport>> {
    let body = match state.probe.run().await {
        ProbeOutcome::Healthy(report) => ApiResponse::success(
            format!("{} is running healthy!", state.config.app.name),
            report,
        ),
        ProbeOutcome::Unhealthy(report) => ApiResponse::error(UNHEALTHY_MESSAGE, Some(report)),
    };
    Json(body)
}
