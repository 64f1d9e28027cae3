//! JSON prediction API
//!
//! Same pipelines as the form pages, for scripted clients.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mdp_common::pipeline::{Outcome, Prediction};
use mdp_common::schema::RawValues;
use mdp_common::{Condition, FieldSpec, Label};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ConditionInfo {
    pub condition: Condition,
    pub title: &'static str,
    pub action: &'static str,
    pub fields: &'static [FieldSpec],
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub condition: Condition,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<&'static str>,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            condition: prediction.condition,
            outcome: prediction.outcome,
            label: prediction.label,
            message: prediction.message(),
            advice: prediction.advice(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/conditions
///
/// Lists every condition with its feature schema in fitted order
pub async fn list_conditions() -> Json<Vec<ConditionInfo>> {
    Json(
        Condition::ALL
            .into_iter()
            .map(|condition| ConditionInfo {
                condition,
                title: condition.title(),
                action: condition.button_label(),
                fields: condition.schema().fields,
            })
            .collect(),
    )
}

/// POST /api/predict/:condition
///
/// Body is an object of field name to number (or numeric string).
/// Rejected input answers 422 with the condition's invalid-input message,
/// including bodies that are not a JSON object. An unknown condition is 404
/// whatever the body.
pub async fn predict_json(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    body: Result<Json<HashMap<String, Value>>, JsonRejection>,
) -> Response {
    let condition = match slug.parse::<Condition>() {
        Ok(condition) => condition,
        Err(e) => {
            return (StatusCode::NOT_FOUND, Json(ErrorResponse { error: e })).into_response()
        }
    };

    let prediction = match body {
        Ok(Json(body)) => state.registry.pipeline(condition).predict(&to_raw_values(body)),
        Err(rejection) => {
            debug!("{} API body rejected: {}", condition, rejection.body_text());
            Prediction::invalid(condition)
        }
    };
    debug!("{} API prediction: {:?}", condition, prediction.outcome);

    let status = match prediction.outcome {
        Outcome::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };
    (status, Json(PredictResponse::from(prediction))).into_response()
}

/// Numbers and strings become form text; `null` counts as absent and any
/// other JSON value is passed through as text so it fails to parse.
fn to_raw_values(body: HashMap<String, Value>) -> RawValues {
    body.into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(text) => Some((key, text)),
            other => Some((key, other.to_string())),
        })
        .collect()
}
