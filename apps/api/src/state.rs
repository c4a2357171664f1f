use crate::analysis::orchestrator::Orchestrator;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless pipeline over the immutable prompt table and the generator backend.
    pub orchestrator: Orchestrator,
    pub config: Config,
}
