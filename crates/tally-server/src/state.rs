use std::sync::Arc;

use tally_core::{config::Config, store::VisitStore};

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
pub struct AppState {
    /// The visit store. Internally serializes check-then-append through a
    /// `tokio::sync::Mutex`, so it is safe to share across handlers.
    pub store: VisitStore,

    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: VisitStore, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
