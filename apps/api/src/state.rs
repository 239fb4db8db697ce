use std::sync::Arc;

use crate::config::Config;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway. Opened once at startup and shared by every request.
    pub store: Arc<dyn ResumeStore>,
    pub config: Config,
}
