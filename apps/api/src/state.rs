use crate::config::Config;
use crate::layout::LayoutConstants;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

impl AppState {
    /// Layout table used when a preview request does not bring its own.
    pub fn default_layout(&self) -> &LayoutConstants {
        &self.config.layout
    }
}
