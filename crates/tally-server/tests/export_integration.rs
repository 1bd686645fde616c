use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tally_core::config::{Config, Environment};
use tally_core::store::VisitStore;
use tally_server::app::build_app;
use tally_server::state::AppState;

fn test_config(data_dir: &std::path::Path) -> Config {
    Config {
        port: 0,
        data_dir: data_dir.display().to_string(),
        cors_origins: vec![],
        environment: Environment::Development,
    }
}

fn setup(dir: &tempfile::TempDir) -> axum::Router {
    let config = test_config(dir.path());
    let store = VisitStore::open(config.visits_path());
    let state = Arc::new(AppState::new(store, config));
    build_app(state)
}

fn get_json_request() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/get-json")
        .body(Body::empty())
        .expect("build request")
}

async fn body_bytes(response: axum::http::Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes()
        .to_vec()
}

// ============================================================
// BDD: /get-json passes the durable document through unchanged
// ============================================================
#[tokio::test]
async fn test_get_json_is_byte_for_byte_passthrough() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = setup(&dir);

    // Record one visit so the document is non-trivial.
    let visit = Request::builder()
        .method("POST")
        .uri("/visit")
        .header("x-forwarded-for", "1.2.3.4")
        .header("user-agent", "Mozilla/5.0 Chrome/120")
        .body(Body::empty())
        .expect("build request");
    app.clone().oneshot(visit).await.expect("request");

    let on_disk = std::fs::read(dir.path().join("visits.json")).expect("read file");

    let response = app.oneshot(get_json_request()).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );

    let body = body_bytes(response).await;
    assert_eq!(body, on_disk);

    let records: Value = serde_json::from_slice(&body).expect("parse JSON");
    let records = records.as_array().expect("array document");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["ip"], "1.2.3.4");
    assert!(records[0]["date"].is_string());
    assert!(records[0]["time"].is_string());
    assert_eq!(records[0]["userAgent"], "Mozilla/5.0 Chrome/120");
}

// ============================================================
// BDD: /get-json serves the volatile copy when the file is gone
// ============================================================
#[tokio::test]
async fn test_get_json_falls_back_to_volatile_copy() {
    let dir = tempfile::tempdir().expect("tempdir");
    // Point the store at the directory itself so durable I/O always fails.
    let config = test_config(dir.path());
    let store = VisitStore::open(dir.path());
    let state = Arc::new(AppState::new(store, config));
    let app = build_app(state);

    let visit = Request::builder()
        .method("POST")
        .uri("/visit")
        .header("x-forwarded-for", "1.2.3.4")
        .body(Body::empty())
        .expect("build request");
    app.clone().oneshot(visit).await.expect("request");

    let response = app.oneshot(get_json_request()).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let records: Value =
        serde_json::from_slice(&body_bytes(response).await).expect("parse JSON");
    assert_eq!(records.as_array().expect("array document").len(), 1);
}
