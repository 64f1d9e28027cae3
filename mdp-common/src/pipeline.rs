//! Generic prediction pipeline
//!
//! One pipeline per condition, all built from the same parts: the feature
//! schema, a fitted scaler, a fitted classifier and the condition's result
//! mapping. A run is single-shot and side-effect free:
//!
//! 1. assemble the feature vector in schema order
//! 2. scale it
//! 3. classify it
//! 4. map the label to the condition's message
//!
//! Failures in steps 1-3 collapse into `Outcome::InvalidInput`.

use crate::artifact::{Classifier, Label, Scaler};
use crate::error::PredictionError;
use crate::schema::{Condition, RawValues};
use serde::Serialize;
use tracing::{debug, warn};

// ============================================================================
// Result mapping
// ============================================================================

/// Headline plus follow-up advice shown for one outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub headline: &'static str,
    pub advice: &'static str,
}

/// Fixed messages of one condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultMapping {
    pub detected: Verdict,
    pub not_detected: Verdict,
    pub invalid_input: &'static str,
}

impl Condition {
    pub fn result_mapping(self) -> &'static ResultMapping {
        match self {
            Condition::Diabetes => &DIABETES_MESSAGES,
            Condition::Heart => &HEART_MESSAGES,
            Condition::Parkinsons => &PARKINSONS_MESSAGES,
        }
    }
}

static DIABETES_MESSAGES: ResultMapping = ResultMapping {
    detected: Verdict {
        headline: "HIGH RISK: The person is likely to have diabetes",
        advice: "Consult a healthcare professional immediately",
    },
    not_detected: Verdict {
        headline: "LOW RISK: The person is unlikely to have diabetes",
        advice: "Maintain a healthy lifestyle!",
    },
    invalid_input: "Please enter valid numbers for all fields",
};

static HEART_MESSAGES: ResultMapping = ResultMapping {
    detected: Verdict {
        headline: "HIGH RISK: Heart disease detected",
        advice: "Immediate medical consultation recommended",
    },
    not_detected: Verdict {
        headline: "LOW RISK: No heart disease detected",
        advice: "Keep up the healthy heart habits!",
    },
    invalid_input: "Please enter valid data for all fields",
};

static PARKINSONS_MESSAGES: ResultMapping = ResultMapping {
    detected: Verdict {
        headline: "POSITIVE: Parkinson's disease detected",
        advice: "Consult a neurologist for confirmation",
    },
    not_detected: Verdict {
        headline: "NEGATIVE: No Parkinson's disease detected",
        advice: "Voice parameters are within normal range",
    },
    invalid_input: "Please enter valid numbers for all voice parameters",
};

// ============================================================================
// Outcomes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Detected,
    NotDetected,
    InvalidInput,
}

impl Outcome {
    /// Only a label equal to 1 counts as detected; every other label,
    /// including ones outside {0, 1}, falls through to not detected.
    pub fn from_label(label: Label) -> Self {
        if label == 1 {
            Outcome::Detected
        } else {
            Outcome::NotDetected
        }
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    pub condition: Condition,
    pub outcome: Outcome,
    /// Raw classifier label; `None` when the input was rejected
    pub label: Option<Label>,
}

impl Prediction {
    pub fn from_label(condition: Condition, label: Label) -> Self {
        Self {
            condition,
            outcome: Outcome::from_label(label),
            label: Some(label),
        }
    }

    pub fn invalid(condition: Condition) -> Self {
        Self {
            condition,
            outcome: Outcome::InvalidInput,
            label: None,
        }
    }

    /// Headline shown to the user
    pub fn message(&self) -> &'static str {
        let mapping = self.condition.result_mapping();
        match self.outcome {
            Outcome::Detected => mapping.detected.headline,
            Outcome::NotDetected => mapping.not_detected.headline,
            Outcome::InvalidInput => mapping.invalid_input,
        }
    }

    pub fn advice(&self) -> Option<&'static str> {
        let mapping = self.condition.result_mapping();
        match self.outcome {
            Outcome::Detected => Some(mapping.detected.advice),
            Outcome::NotDetected => Some(mapping.not_detected.advice),
            Outcome::InvalidInput => None,
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Schema + scaler + classifier + mapping for one condition
pub struct Pipeline {
    condition: Condition,
    scaler: Box<dyn Scaler>,
    classifier: Box<dyn Classifier>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("condition", &self.condition)
            .field("scaler", &self.scaler.describe())
            .field("classifier", &self.classifier.describe())
            .finish()
    }
}

impl Pipeline {
    pub fn new(
        condition: Condition,
        scaler: Box<dyn Scaler>,
        classifier: Box<dyn Classifier>,
    ) -> Self {
        Self {
            condition,
            scaler,
            classifier,
        }
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Steps 2-3 on an already assembled vector
    pub fn classify(&self, features: &[f64]) -> Result<Label, PredictionError> {
        let scaled = self.scaler.transform(features)?;
        self.classifier.predict(&scaled)
    }

    /// Steps 1-3, keeping the failure cause
    pub fn try_predict(&self, raw: &RawValues) -> Result<Label, PredictionError> {
        let features = self.condition.schema().collect(raw)?;
        self.classify(&features)
    }

    /// Full run; never fails, rejected input becomes `Outcome::InvalidInput`
    pub fn predict(&self, raw: &RawValues) -> Prediction {
        match self.try_predict(raw) {
            Ok(label) => {
                if label != 0 && label != 1 {
                    warn!(
                        "{} classifier returned label {} outside {{0, 1}}; reporting not detected",
                        self.condition, label
                    );
                }
                Prediction::from_label(self.condition, label)
            }
            Err(e) => {
                debug!("{} prediction rejected: {}", self.condition, e);
                Prediction::invalid(self.condition)
            }
        }
    }
}
