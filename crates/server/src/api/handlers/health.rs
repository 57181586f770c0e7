use axum::{extract::State, Json};

use crate::models::HealthResponse;
use crate::state::AppState;

/// Check whether the metadata service is reachable
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Metadata service status", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        metadata_available: state.metadata.health_check().await,
        provider: state.metadata.name().to_string(),
    })
}
