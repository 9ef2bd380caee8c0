use std::sync::Arc;

use crate::config::Config;
use crate::editor::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            sessions: Arc::new(SessionStore::new(config.max_sessions)),
            config,
        }
    }
}
