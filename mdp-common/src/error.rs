//! Common error types for MDP

use std::path::PathBuf;
use thiserror::Error;

/// Startup failure while reading one of the model artifacts.
///
/// Any of these aborts the process before the HTTP listener is bound.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// File missing or unreadable
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// ONNX Runtime could not build a session from the file
    #[error("Failed to load model {path}: {reason}")]
    Model { path: PathBuf, reason: String },

    /// Graph loaded but its signature is unusable
    #[error("Invalid artifact {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Per-request failure inside a prediction pipeline.
///
/// Users never see the variant; every one of them renders as the
/// condition's invalid-input message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Field {field}: '{value}' is not a number")]
    NotNumeric { field: String, value: String },

    #[error("Field {field}: '{value}' is not a whole number")]
    NotInteger { field: String, value: String },

    #[error("Field {field}: '{value}' is not a valid option")]
    NotAnOption { field: String, value: String },

    #[error("Field {field}: value is not finite")]
    NotFinite { field: String },

    /// Vector width differs from the width the artifact was fitted on
    #[error("Shape mismatch: expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Model produced a non-finite value")]
    NonFiniteOutput,

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Configuration file loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
