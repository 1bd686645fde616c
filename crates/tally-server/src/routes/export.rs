use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse};

use crate::state::AppState;

/// `GET /get-json` — diagnostic passthrough of the on-disk visit log.
///
/// Serves the durable document byte-for-byte, so it reflects durable state
/// exactly even if an in-memory change has not been committed yet. When the
/// file cannot be read, the store serializes its volatile copy instead.
#[tracing::instrument(skip(state))]
pub async fn get_json(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let bytes = state.store.raw_dump().await;
    ([(header::CONTENT_TYPE, "application/json")], bytes)
}
