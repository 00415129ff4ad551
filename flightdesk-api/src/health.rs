use axum::{extract::State, routing::get, Json, Router};
use flightdesk_core::FlightStore;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = match state.flight_store.ping().await {
        Ok(()) => "connected".to_string(),
        Err(e) => {
            tracing::warn!("Health probe failed: {}", e);
            format!("error: {}", e)
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        store,
    })
}
