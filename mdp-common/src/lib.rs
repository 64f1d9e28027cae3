//! # MDP Common Library
//!
//! Shared code for the multiple disease prediction service:
//! - Feature schemas for each condition (field order, bounds, defaults)
//! - Scaler and classifier artifacts behind the `Scaler`/`Classifier` traits
//! - Model registry loading the six artifacts once at startup
//! - The generic prediction pipeline and its result mapping
//! - Configuration resolution

pub mod artifact;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod schema;

pub use artifact::{Classifier, Label, Scaler};
pub use error::{ArtifactError, ConfigError, PredictionError};
pub use pipeline::{Outcome, Pipeline, Prediction};
pub use registry::ModelRegistry;
pub use schema::{Condition, FeatureSchema, FieldKind, FieldSpec};
