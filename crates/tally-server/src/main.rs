use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use tally_core::{config::Config, store::VisitStore};
use tally_server::state::AppState;

/// `tally health` — liveness probe for Docker HEALTHCHECK.
///
/// Calls `GET http://localhost:$TALLY_PORT/health`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("TALLY_PORT").unwrap_or_else(|_| "3000".to_string());
    let url = format!("http://localhost:{}/health", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Health-check subcommand — handled before anything else so the binary
    // stays fast when used as a Docker HEALTHCHECK probe.
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }

    // Initialise structured JSON logging. Level controlled via RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tally=info".parse()?),
        )
        .json()
        .init();

    let cfg = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Ensure the data directory exists before probing the visit log.
    std::fs::create_dir_all(&cfg.data_dir)?;
    let store = VisitStore::open(cfg.visits_path());

    let state = Arc::new(AppState::new(store, cfg.clone()));
    let app = tally_server::app::build_app(Arc::clone(&state));

    let addr = format!("0.0.0.0:{}", cfg.port);
    info!(port = cfg.port, environment = ?cfg.environment, "tally listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        tokio::signal::ctrl_c().await.ok();
    })
    .await?;

    Ok(())
}
