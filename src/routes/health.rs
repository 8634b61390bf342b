use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::debug;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// False means every /api request will answer 500 until a token is set.
    pub upstream_configured: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let upstream_configured = state.price_provider.is_configured();
    debug!(upstream_configured, "GET /health");
    Json(HealthStatus {
        status: "ok",
        upstream_configured,
    })
}
