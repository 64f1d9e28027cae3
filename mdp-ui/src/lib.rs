//! mdp-ui library - web front end for the prediction pipelines
//!
//! Serves one form page per condition plus a small JSON API. All handlers
//! share the same read-only model registry.

use axum::Router;
use mdp_common::ModelRegistry;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod render;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Artifacts loaded at startup, never mutated
    pub registry: Arc<ModelRegistry>,
}

impl AppState {
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/conditions", get(api::list_conditions))
        .route("/api/predict/:condition", post(api::predict_json));

    let pages = Router::new()
        .route("/", get(api::serve_root))
        .route("/:condition", get(api::show_form).post(api::submit_form))
        .route("/static/style.css", get(api::serve_style_css))
        .fallback(api::not_found);

    Router::new()
        .merge(api)
        .merge(pages)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
