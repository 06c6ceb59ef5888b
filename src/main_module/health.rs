use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::core::shared::state::AppState;

/// Liveness plus a check that the data directory is reachable.
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    let data_dir = &state.config.data.data_dir;
    let storage_ok = !data_dir.exists() || data_dir.is_dir();

    let (code, status) = if storage_ok {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(serde_json::json!({
            "status": status,
            "service": "crmserver",
            "version": env!("CARGO_PKG_VERSION"),
            "storage": storage_ok
        })),
    )
}
