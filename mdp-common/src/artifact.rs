//! Fitted scaler and classifier artifacts
//!
//! Both halves of a pipeline are exported ONNX graphs executed by ONNX
//! Runtime. The pipeline only ever sees the `Scaler` and `Classifier`
//! capabilities; what a graph computes is opaque here. Load time checks the
//! graph's signature: a single float input of fixed feature width, and a
//! first output holding the transformed vector (scaler) or the class label
//! (classifier).

use crate::error::{ArtifactError, PredictionError};
use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{Tensor, ValueType};
use parking_lot::Mutex;
use std::path::Path;

/// Raw class label produced by a classifier
pub type Label = i64;

/// Fitted transform from a raw feature vector to a normalized one of the same width
pub trait Scaler: Send + Sync {
    /// Width the scaler was fitted on
    fn n_features(&self) -> usize;

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError>;

    /// Short name for logs
    fn describe(&self) -> &str;
}

/// Fitted function from a normalized feature vector to a class label
pub trait Classifier: Send + Sync {
    /// Width the classifier was fitted on
    fn n_features(&self) -> usize;

    fn predict(&self, features: &[f64]) -> Result<Label, PredictionError>;

    /// Short name for logs
    fn describe(&self) -> &str;
}

// ============================================================================
// ONNX graphs
// ============================================================================

/// Session plus the signature facts checked at load.
///
/// `Session::run` needs exclusive access, so concurrent requests on the same
/// pipeline serialize on the mutex.
struct OnnxGraph {
    session: Mutex<Session>,
    n_features: usize,
    output: String,
    name: String,
}

impl OnnxGraph {
    fn load(path: &Path) -> Result<Self, ArtifactError> {
        let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model_error = |reason: String| ArtifactError::Model {
            path: path.to_path_buf(),
            reason,
        };

        let session = Session::builder()
            .map_err(|e| model_error(format!("session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| model_error(format!("optimization level: {}", e)))?
            .commit_from_memory(&bytes)
            .map_err(|e| model_error(e.to_string()))?;

        let invalid = |reason: String| ArtifactError::Invalid {
            path: path.to_path_buf(),
            reason,
        };
        let n_features = feature_width(&session).map_err(invalid)?;
        let output = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| invalid("graph has no outputs".to_string()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            session: Mutex::new(session),
            n_features,
            output,
            name,
        })
    }

    fn input(&self, features: &[f64]) -> Result<Tensor<f32>, PredictionError> {
        if features.len() != self.n_features {
            return Err(PredictionError::ShapeMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        let data = features.iter().map(|&x| x as f32).collect();
        let array = Array2::from_shape_vec((1, self.n_features), data)
            .map_err(|e| PredictionError::Inference(e.to_string()))?;
        Tensor::from_array(array).map_err(|e| PredictionError::Inference(e.to_string()))
    }

    fn missing_output(&self) -> PredictionError {
        PredictionError::Inference(format!("no output '{}'", self.output))
    }
}

/// Feature width of the graph's only input, which must be fixed
fn feature_width(session: &Session) -> Result<usize, String> {
    let input = match session.inputs.as_slice() {
        [input] => input,
        inputs => return Err(format!("expected 1 input, found {}", inputs.len())),
    };
    match &input.input_type {
        ValueType::Tensor { shape, .. } => match shape.last() {
            Some(&width) if width > 0 => Ok(width as usize),
            _ => Err(format!("input '{}' has no fixed feature width", input.name)),
        },
        _ => Err(format!("input '{}' is not a tensor", input.name)),
    }
}

fn inference_error(e: impl std::fmt::Display) -> PredictionError {
    PredictionError::Inference(e.to_string())
}

// ============================================================================
// Scaler
// ============================================================================

/// Exported scaler graph; the first output is the transformed vector
pub struct OnnxScaler {
    graph: OnnxGraph,
}

impl OnnxScaler {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        Ok(Self {
            graph: OnnxGraph::load(path)?,
        })
    }
}

impl Scaler for OnnxScaler {
    fn n_features(&self) -> usize {
        self.graph.n_features
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError> {
        let input = self.graph.input(features)?;

        let mut session = self.graph.session.lock();
        let outputs = session.run(ort::inputs![input]).map_err(inference_error)?;
        let output = outputs
            .get(self.graph.output.as_str())
            .ok_or_else(|| self.graph.missing_output())?;
        let (_, data) = output.try_extract_tensor::<f32>().map_err(inference_error)?;

        if data.len() != features.len() {
            return Err(PredictionError::ShapeMismatch {
                expected: features.len(),
                actual: data.len(),
            });
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(PredictionError::NonFiniteOutput);
        }
        Ok(data.iter().map(|&v| f64::from(v)).collect())
    }

    fn describe(&self) -> &str {
        &self.graph.name
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Exported classifier graph; the first output is the int64 label tensor
pub struct OnnxClassifier {
    graph: OnnxGraph,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        Ok(Self {
            graph: OnnxGraph::load(path)?,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn n_features(&self) -> usize {
        self.graph.n_features
    }

    fn predict(&self, features: &[f64]) -> Result<Label, PredictionError> {
        let input = self.graph.input(features)?;

        let mut session = self.graph.session.lock();
        let outputs = session.run(ort::inputs![input]).map_err(inference_error)?;
        let output = outputs
            .get(self.graph.output.as_str())
            .ok_or_else(|| self.graph.missing_output())?;
        let (_, labels) = output.try_extract_tensor::<i64>().map_err(inference_error)?;

        labels
            .first()
            .copied()
            .ok_or_else(|| PredictionError::Inference("empty label tensor".to_string()))
    }

    fn describe(&self) -> &str {
        &self.graph.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/units")
            .join(name)
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-5, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_scaler_transform() {
        // offset [10, 2], std [5, 0.5]
        let s = OnnxScaler::load(&fixture("standard_scaler.onnx")).unwrap();
        assert_eq!(s.n_features(), 2);
        assert_eq!(s.describe(), "standard_scaler.onnx");
        assert_close(&s.transform(&[20.0, 1.0]).unwrap(), &[2.0, -2.0]);
    }

    #[test]
    fn test_scaler_shape_mismatch() {
        let s = OnnxScaler::load(&fixture("standard_scaler.onnx")).unwrap();
        assert_eq!(
            s.transform(&[1.0, 2.0, 3.0]),
            Err(PredictionError::ShapeMismatch { expected: 2, actual: 3 })
        );
    }

    #[test]
    fn test_dynamic_width_rejected() {
        match OnnxScaler::load(&fixture("dynamic_width_scaler.onnx")) {
            Err(ArtifactError::Invalid { reason, .. }) => assert!(reason.contains("feature width")),
            Err(e) => panic!("expected Invalid, got {}", e),
            Ok(_) => panic!("expected Invalid, got a scaler"),
        }
    }

    #[test]
    fn test_garbage_file_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("model.onnx");
        std::fs::write(&path, "kind: linear\ncoef: [1, 2]").unwrap();

        assert!(matches!(OnnxClassifier::load(&path), Err(ArtifactError::Model { .. })));
    }

    #[test]
    fn test_linear_classifier_sign() {
        // Positive class when x0 - x1 > 0
        let c = OnnxClassifier::load(&fixture("sign_classifier.onnx")).unwrap();
        assert_eq!(c.n_features(), 2);
        assert_eq!(c.predict(&[2.0, 1.0]).unwrap(), 1);
        assert_eq!(c.predict(&[1.0, 2.0]).unwrap(), 0);
        // Decision exactly zero belongs to the first class
        assert_eq!(c.predict(&[1.0, 1.0]).unwrap(), 0);
    }

    #[test]
    fn test_classifier_uses_declared_classes() {
        let c = OnnxClassifier::load(&fixture("declared_classes.onnx")).unwrap();
        assert_eq!(c.predict(&[1.0]).unwrap(), 2);
        assert_eq!(c.predict(&[-1.0]).unwrap(), 0);
    }

    #[test]
    fn test_tree_classifier_loads() {
        // Single split at 0.5
        let c = OnnxClassifier::load(&fixture("stump_classifier.onnx")).unwrap();
        assert_eq!(c.n_features(), 1);
        assert_eq!(c.predict(&[0.2]).unwrap(), 0);
        assert_eq!(c.predict(&[0.9]).unwrap(), 1);
    }

    #[test]
    fn test_classifier_shape_mismatch() {
        let c = OnnxClassifier::load(&fixture("sign_classifier.onnx")).unwrap();
        assert!(matches!(c.predict(&[1.0]), Err(PredictionError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_repeated_runs_are_stable() {
        let c = OnnxClassifier::load(&fixture("sign_classifier.onnx")).unwrap();
        for _ in 0..5 {
            assert_eq!(c.predict(&[3.0, -1.0]).unwrap(), 1);
        }
    }
}
