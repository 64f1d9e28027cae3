//! End-to-end tests against the artifacts shipped in ./models
//!
//! The shipped graphs are reference exports written by
//! scripts/export_reference_models.py (dataset means and deviations with a
//! linear classifier), not the original fitted estimators. Expected labels
//! follow from those parameters; replacing the exports means revisiting them.

use mdp_common::schema::RawValues;
use mdp_common::{Condition, ModelRegistry, Outcome};
use std::path::PathBuf;

fn models_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../models")
}

fn registry() -> ModelRegistry {
    ModelRegistry::load(&models_dir()).expect("Shipped artifacts should load")
}

fn raw(condition: Condition, values: &[f64]) -> RawValues {
    let schema = condition.schema();
    assert_eq!(values.len(), schema.len());
    schema
        .fields
        .iter()
        .zip(values)
        .map(|(field, value)| (field.key.to_string(), value.to_string()))
        .collect()
}

#[test]
fn test_shipped_artifacts_match_schema_widths() {
    let registry = registry();
    for condition in Condition::ALL {
        let pipeline = registry.pipeline(condition);
        assert_eq!(pipeline.scaler().n_features(), condition.schema().len());
        assert_eq!(pipeline.classifier().n_features(), condition.schema().len());
    }
}

#[test]
fn test_diabetes_scenario() {
    let registry = registry();
    let values = raw(Condition::Diabetes, &[0.0, 120.0, 80.0, 20.0, 100.0, 25.0, 0.5, 30.0]);

    let prediction = registry.pipeline(Condition::Diabetes).predict(&values);
    assert_eq!(prediction.outcome, Outcome::NotDetected);
    assert_eq!(prediction.label, Some(0));
    assert_eq!(prediction.message(), "LOW RISK: The person is unlikely to have diabetes");
}

#[test]
fn test_diabetes_high_risk_vector() {
    let registry = registry();
    let values = raw(Condition::Diabetes, &[6.0, 190.0, 72.0, 35.0, 0.0, 42.0, 1.2, 52.0]);

    let prediction = registry.pipeline(Condition::Diabetes).predict(&values);
    assert_eq!(prediction.outcome, Outcome::Detected);
    assert_eq!(prediction.message(), "HIGH RISK: The person is likely to have diabetes");
}

#[test]
fn test_heart_defaults_scenario() {
    let registry = registry();
    let defaults = Condition::Heart.schema().default_values();

    let prediction = registry.pipeline(Condition::Heart).predict(&defaults);
    assert_ne!(prediction.outcome, Outcome::InvalidInput);
    assert_eq!(prediction.label, Some(1));
}

#[test]
fn test_heart_known_vector() {
    let registry = registry();
    let values = raw(
        Condition::Heart,
        &[63.0, 1.0, 0.0, 145.0, 233.0, 1.0, 0.0, 120.0, 1.0, 3.5, 0.0, 3.0, 2.0],
    );

    let prediction = registry.pipeline(Condition::Heart).predict(&values);
    assert_eq!(prediction.outcome, Outcome::NotDetected);
    assert_eq!(prediction.message(), "LOW RISK: No heart disease detected");
}

#[test]
fn test_parkinsons_defaults_scenario() {
    let registry = registry();
    let defaults = Condition::Parkinsons.schema().default_values();

    let prediction = registry.pipeline(Condition::Parkinsons).predict(&defaults);
    assert_eq!(prediction.outcome, Outcome::Detected);
    assert_eq!(prediction.message(), "POSITIVE: Parkinson's disease detected");
}

#[test]
fn test_parkinsons_known_vector() {
    let registry = registry();
    let values = raw(
        Condition::Parkinsons,
        &[
            197.076, 206.896, 192.055, 0.00289, 0.00001, 0.00166, 0.00168, 0.00498, 0.01098,
            0.097, 0.00563, 0.0068, 0.00802, 0.01689, 0.00339, 26.775, 0.422229, 0.741367,
            -7.3483, 0.177551, 1.743867, 0.085569,
        ],
    );

    let prediction = registry.pipeline(Condition::Parkinsons).predict(&values);
    assert_eq!(prediction.outcome, Outcome::NotDetected);
}

#[test]
fn test_predictions_are_deterministic() {
    let registry = registry();
    for condition in Condition::ALL {
        let defaults = condition.schema().default_values();
        let first = registry.pipeline(condition).predict(&defaults);
        for _ in 0..10 {
            assert_eq!(registry.pipeline(condition).predict(&defaults), first);
        }
    }
}

#[test]
fn test_non_numeric_input_every_field() {
    let registry = registry();
    for condition in Condition::ALL {
        let schema = condition.schema();
        for field in schema.fields {
            let mut values = schema.default_values();
            values.insert(field.key.to_string(), "twelve".to_string());

            let prediction = registry.pipeline(condition).predict(&values);
            assert_eq!(prediction.outcome, Outcome::InvalidInput, "{}.{}", condition, field.key);
            assert_eq!(prediction.message(), condition.result_mapping().invalid_input);
        }
    }
}
