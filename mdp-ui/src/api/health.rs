//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use mdp_common::Condition;
use serde::Serialize;

use crate::AppState;

/// One loaded pipeline as seen by the health check
#[derive(Debug, Serialize)]
pub struct PipelineHealth {
    pub condition: Condition,
    pub scaler: String,
    pub classifier: String,
    /// Width the artifacts were fitted on
    pub features: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub pipelines: Vec<PipelineHealth>,
}

/// GET /health
///
/// The router only exists once every artifact has loaded, so a response
/// here means all three pipelines are ready.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let pipelines = Condition::ALL
        .into_iter()
        .map(|condition| {
            let pipeline = state.registry.pipeline(condition);
            PipelineHealth {
                condition,
                scaler: pipeline.scaler().describe().to_string(),
                classifier: pipeline.classifier().describe().to_string(),
                features: pipeline.classifier().n_features(),
            }
        })
        .collect();

    Json(HealthResponse {
        status: "ok",
        module: "mdp-ui",
        version: env!("CARGO_PKG_VERSION"),
        pipelines,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
