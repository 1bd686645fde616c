use axum::{response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::json;

/// `GET /health` — liveness only, no dependency checks.
///
/// Response shape:
/// ```json
/// { "status": "healthy", "timestamp": "2025-06-03T12:00:00.000Z" }
/// ```
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }))
}
