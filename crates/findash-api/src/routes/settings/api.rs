//! Settings API endpoints - JSON API

use crate::AppState;
use axum::extract::State;
use axum::Json;

/// Effective configuration, plus where the data came from
pub async fn api_settings(State(state): State<AppState>) -> Json<serde_json::Value> {
    let dashboard = state.dashboard.read().await;
    Json(serde_json::json!({
        "config": state.config,
        "source": dashboard.source_description(),
        "loaded_at": dashboard.loaded_at().map(|t| t.to_rfc3339()),
        "ai_ready": state.ai.is_some(),
    }))
}
