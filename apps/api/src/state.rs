use std::sync::Arc;

use crate::recommend::engine::RecommendationEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once before the listener starts; read-only afterwards.
    pub engine: Arc<RecommendationEngine>,
}
