use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /health - storage connectivity check
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    match state.lists.ping().await {
        Ok(()) => Ok(Json(json!({
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err(ApiError::service_unavailable("database unavailable"))
        }
    }
}
