use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use serde_json::json;

use crate::{client_ip::ClientIp, error::AppError, state::AppState};

/// `POST /visit` — record a visit for the resolved caller identity.
///
/// De-duplicated per (identity, UTC date): the first call on a given day
/// appends a record, later calls the same day are no-ops. Either way the
/// response carries the current total.
///
/// ## Response
/// `200 OK` with `{ "count": n, "visitedToday": bool, "success": true }`.
#[tracing::instrument(skip(state, headers))]
pub async fn record_visit(
    State(state): State<Arc<AppState>>,
    ClientIp(identity): ClientIp,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let outcome = state.store.record_visit(&identity, user_agent).await;

    Ok(Json(json!({
        "count": outcome.count,
        "visitedToday": outcome.already_visited_today,
        "success": true
    })))
}

/// `GET /visit-count` — current total without recording anything.
#[tracing::instrument(skip(state))]
pub async fn visit_count(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let count = state.store.total_count().await;

    Ok(Json(json!({
        "count": count,
        "success": true
    })))
}
