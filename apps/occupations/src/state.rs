use std::sync::Arc;

use crate::occupations::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the transport, endpoints and store; runs are serialised inside.
    pub pipeline: Arc<Pipeline>,
}
