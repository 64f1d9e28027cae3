//! Static asset serving

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

const STYLE_CSS: &str = include_str!("../../ui/style.css");

/// GET /static/style.css
pub async fn serve_style_css() -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/css")], STYLE_CSS).into_response()
}
