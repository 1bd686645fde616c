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

fn setup(dir: &tempfile::TempDir) -> axum::Router {
    let config = Config {
        port: 0,
        data_dir: dir.path().display().to_string(),
        cors_origins: vec![],
        environment: Environment::Development,
    };
    let store = VisitStore::open(config.visits_path());
    let state = Arc::new(AppState::new(store, config));
    build_app(state)
}

async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse JSON")
}

// ============================================================
// BDD: Health check is always 200 and carries a timestamp
// ============================================================
#[tokio::test]
async fn test_health_returns_healthy_with_timestamp() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = setup(&dir);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build request");

    let response = app.oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");

    let timestamp = json["timestamp"].as_str().expect("timestamp string");
    chrono::DateTime::parse_from_rfc3339(timestamp).expect("ISO-8601 timestamp");
}
