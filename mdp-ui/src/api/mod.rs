//! HTTP API handlers for mdp-ui

pub mod health;
pub mod pages;
pub mod predict;
pub mod ui;

pub use health::health_routes;
pub use pages::{not_found, serve_root, show_form, submit_form};
pub use predict::{list_conditions, predict_json};
pub use ui::serve_style_css;
