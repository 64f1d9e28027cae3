//! Condition form pages
//!
//! GET renders the form at its declared defaults; POST runs the condition's
//! pipeline on the submitted values and renders the same form with the
//! outcome underneath.

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use mdp_common::pipeline::Prediction;
use mdp_common::schema::RawValues;
use mdp_common::Condition;
use tracing::{debug, info};

use crate::render;
use crate::AppState;

/// GET /
///
/// Redirects to the first entry of the navigation menu
pub async fn serve_root() -> Redirect {
    Redirect::to(&format!("/{}", Condition::ALL[0].slug()))
}

/// GET /:condition
pub async fn show_form(Path(slug): Path<String>) -> Response {
    match slug.parse::<Condition>() {
        Ok(condition) => {
            let defaults = condition.schema().default_values();
            Html(render::condition_page(condition, &defaults, None)).into_response()
        }
        Err(_) => not_found_response(&format!("/{}", slug)),
    }
}

/// POST /:condition
///
/// Always answers 200 for a known condition; rejected input is reported in
/// the page, not through the status code. A body that is not a form at all
/// gets the same invalid-input message as a bad field.
pub async fn submit_form(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    form: Result<Form<RawValues>, FormRejection>,
) -> Response {
    let Ok(condition) = slug.parse::<Condition>() else {
        return not_found_response(&format!("/{}", slug));
    };

    let (values, prediction) = match form {
        Ok(Form(values)) => {
            let prediction = state.registry.pipeline(condition).predict(&values);
            (values, prediction)
        }
        Err(rejection) => {
            debug!("{} form body rejected: {}", condition, rejection.body_text());
            (RawValues::new(), Prediction::invalid(condition))
        }
    };
    info!("{} prediction: {:?}", condition, prediction.outcome);

    Html(render::condition_page(condition, &values, Some(&prediction))).into_response()
}

/// Fallback for every unmatched route
pub async fn not_found(uri: Uri) -> Response {
    not_found_response(uri.path())
}

fn not_found_response(path: &str) -> Response {
    (StatusCode::NOT_FOUND, Html(render::not_found_page(path))).into_response()
}
