//! Model registry - loads the six artifacts once at startup
//!
//! Layout under the models directory:
//!
//! ```text
//! diabetes/diabetes_scaler.onnx      diabetes/diabetes_model.onnx
//! heart/heart_scaler.onnx            heart/heart_model.onnx
//! parkinsons/parkinsons_scaler.onnx  parkinsons/parkinsons_model.onnx
//! ```
//!
//! Loading is all-or-nothing: the registry exists only if every artifact was
//! read and built. It is never mutated afterwards, so one instance is shared
//! by every request.

use crate::artifact::{Classifier, OnnxClassifier, OnnxScaler, Scaler};
use crate::error::ArtifactError;
use crate::pipeline::Pipeline;
use crate::schema::Condition;
use std::path::{Path, PathBuf};
use tracing::info;

/// Location of one condition's artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub scaler: PathBuf,
    pub classifier: PathBuf,
}

impl ArtifactPaths {
    pub fn for_condition(models_dir: &Path, condition: Condition) -> Self {
        let slug = condition.slug();
        let dir = models_dir.join(slug);
        Self {
            scaler: dir.join(format!("{}_scaler.onnx", slug)),
            classifier: dir.join(format!("{}_model.onnx", slug)),
        }
    }
}

/// Loaded pipelines for all conditions
#[derive(Debug)]
pub struct ModelRegistry {
    diabetes: Pipeline,
    heart: Pipeline,
    parkinsons: Pipeline,
}

impl ModelRegistry {
    /// Read and build every artifact; the first failure aborts the load
    pub fn load(models_dir: &Path) -> Result<Self, ArtifactError> {
        info!("Loading model artifacts from {}", models_dir.display());
        Ok(Self {
            diabetes: load_pipeline(models_dir, Condition::Diabetes)?,
            heart: load_pipeline(models_dir, Condition::Heart)?,
            parkinsons: load_pipeline(models_dir, Condition::Parkinsons)?,
        })
    }

    pub fn pipeline(&self, condition: Condition) -> &Pipeline {
        match condition {
            Condition::Diabetes => &self.diabetes,
            Condition::Heart => &self.heart,
            Condition::Parkinsons => &self.parkinsons,
        }
    }
}

fn load_pipeline(models_dir: &Path, condition: Condition) -> Result<Pipeline, ArtifactError> {
    let paths = ArtifactPaths::for_condition(models_dir, condition);

    let scaler = OnnxScaler::load(&paths.scaler)?;
    let classifier = OnnxClassifier::load(&paths.classifier)?;

    info!(
        "✓ {} artifacts loaded: {} ({} features), {} ({} features)",
        condition,
        scaler.describe(),
        scaler.n_features(),
        classifier.describe(),
        classifier.n_features()
    );

    Ok(Pipeline::new(condition, Box::new(scaler), Box::new(classifier)))
}
