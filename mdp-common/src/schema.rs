//! Feature schemas for the three conditions
//!
//! Each schema is the single source of truth for a condition's form:
//! field order (which must match the order the artifacts were fitted on),
//! labels, bounds, defaults and enumerated options.

use crate::error::PredictionError;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Raw form values keyed by field name, as submitted by the browser
pub type RawValues = HashMap<String, String>;

// ============================================================================
// Conditions
// ============================================================================

/// One of the three supported conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Diabetes,
    Heart,
    Parkinsons,
}

impl Condition {
    /// Navigation order; the first entry is the default page
    pub const ALL: [Condition; 3] = [Condition::Diabetes, Condition::Heart, Condition::Parkinsons];

    /// URL path segment and artifact subdirectory name
    pub fn slug(self) -> &'static str {
        match self {
            Condition::Diabetes => "diabetes",
            Condition::Heart => "heart",
            Condition::Parkinsons => "parkinsons",
        }
    }

    /// Navigation menu entry
    pub fn title(self) -> &'static str {
        match self {
            Condition::Diabetes => "Diabetes Prediction",
            Condition::Heart => "Heart Disease Prediction",
            Condition::Parkinsons => "Parkinsons Prediction",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Condition::Diabetes => "Diabetes Risk Prediction",
            Condition::Heart => "Heart Disease Risk Prediction",
            Condition::Parkinsons => "Parkinson's Disease Prediction",
        }
    }

    pub fn about(self) -> &'static str {
        match self {
            Condition::Diabetes => {
                "This tool predicts the likelihood of diabetes based on various health parameters. \
                 Enter the patient's medical data below to get an instant prediction."
            }
            Condition::Heart => {
                "This tool predicts the risk of heart disease based on cardiac health parameters. \
                 Provide accurate medical information for reliable predictions."
            }
            Condition::Parkinsons => {
                "This tool analyzes voice measurements to predict Parkinson's disease. \
                 Voice features are used as biomarkers for early detection."
            }
        }
    }

    /// Label of the action control that runs the pipeline
    pub fn button_label(self) -> &'static str {
        match self {
            Condition::Diabetes => "Predict Diabetes Risk",
            Condition::Heart => "Predict Heart Disease Risk",
            Condition::Parkinsons => "Predict Parkinson's Disease",
        }
    }

    /// Number of form columns used by the page layout
    pub fn columns(self) -> usize {
        match self {
            Condition::Parkinsons => 5,
            _ => 3,
        }
    }

    pub fn schema(self) -> &'static FeatureSchema {
        match self {
            Condition::Diabetes => &DIABETES,
            Condition::Heart => &HEART,
            Condition::Parkinsons => &PARKINSONS,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::ALL
            .into_iter()
            .find(|c| c.slug() == s)
            .ok_or_else(|| format!("Unknown condition: {}", s))
    }
}

// ============================================================================
// Field declarations
// ============================================================================

/// Semantic type and valid range of a single input
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Whole number clamped to `[min, max]`
    Integer { min: i64, max: i64 },
    /// Real number, clamped to whichever bounds are declared
    Real {
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
    /// Enumerated code with a display label per option
    Choice { options: &'static [(i64, &'static str)] },
}

/// One named input of a feature schema
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Form key and feature name
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub default: f64,
}

impl FieldSpec {
    /// Parse one raw form value into the number fed to the scaler.
    ///
    /// Out-of-range numbers are clamped to the declared bounds; anything that
    /// cannot be read as a value of this field's kind is rejected.
    pub fn parse(&self, raw: &str) -> Result<f64, PredictionError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(PredictionError::MissingField(self.key.to_string()));
        }

        let value: f64 = text.parse().map_err(|_| PredictionError::NotNumeric {
            field: self.key.to_string(),
            value: text.to_string(),
        })?;
        if !value.is_finite() {
            return Err(PredictionError::NotFinite {
                field: self.key.to_string(),
            });
        }

        match self.kind {
            FieldKind::Integer { min, max } => {
                if value.fract() != 0.0 {
                    return Err(PredictionError::NotInteger {
                        field: self.key.to_string(),
                        value: text.to_string(),
                    });
                }
                Ok(value.clamp(min as f64, max as f64))
            }
            FieldKind::Real { min, max, .. } => {
                let value = min.map_or(value, |lo| value.max(lo));
                Ok(max.map_or(value, |hi| value.min(hi)))
            }
            FieldKind::Choice { options } => {
                if value.fract() == 0.0 && options.iter().any(|(code, _)| *code as f64 == value) {
                    Ok(value)
                } else {
                    Err(PredictionError::NotAnOption {
                        field: self.key.to_string(),
                        value: text.to_string(),
                    })
                }
            }
        }
    }

    /// Render a value the way the form control displays it
    pub fn format_value(&self, value: f64) -> String {
        match self.kind {
            FieldKind::Integer { .. } | FieldKind::Choice { .. } => format!("{}", value as i64),
            FieldKind::Real { .. } => format!("{}", value),
        }
    }
}

/// Ordered list of inputs one classifier expects
#[derive(Debug)]
pub struct FeatureSchema {
    pub fields: &'static [FieldSpec],
}

impl FeatureSchema {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.key)
    }

    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Declared defaults in schema order
    pub fn defaults(&self) -> Vec<f64> {
        self.fields.iter().map(|f| f.default).collect()
    }

    /// Declared defaults as form text, keyed by field name
    pub fn default_values(&self) -> RawValues {
        self.fields
            .iter()
            .map(|f| (f.key.to_string(), f.format_value(f.default)))
            .collect()
    }

    /// Assemble the feature vector in schema order.
    ///
    /// Submission order is irrelevant; extra keys are ignored.
    pub fn collect(&self, raw: &RawValues) -> Result<Vec<f64>, PredictionError> {
        self.fields
            .iter()
            .map(|field| {
                let text = raw
                    .get(field.key)
                    .ok_or_else(|| PredictionError::MissingField(field.key.to_string()))?;
                field.parse(text)
            })
            .collect()
    }
}

// ============================================================================
// Schemas
// ============================================================================

const NO_YES: &[(i64, &str)] = &[(0, "No"), (1, "Yes")];

const fn int(
    key: &'static str,
    label: &'static str,
    min: i64,
    max: i64,
    default: i64,
) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Integer { min, max },
        default: default as f64,
    }
}

const fn real(
    key: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    step: f64,
    default: f64,
) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Real {
            min: Some(min),
            max: Some(max),
            step: Some(step),
        },
        default,
    }
}

const fn free(key: &'static str, label: &'static str, default: f64) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Real {
            min: None,
            max: None,
            step: None,
        },
        default,
    }
}

/// Choice fields default to their first option
const fn choice(
    key: &'static str,
    label: &'static str,
    options: &'static [(i64, &'static str)],
) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Choice { options },
        default: options[0].0 as f64,
    }
}

pub static DIABETES: FeatureSchema = FeatureSchema {
    fields: &[
        int("Pregnancies", "Number of Pregnancies", 0, 20, 0),
        int("Glucose", "Glucose Level (mg/dL)", 0, 300, 120),
        int("BloodPressure", "Blood Pressure (mmHg)", 0, 200, 80),
        int("SkinThickness", "Skin Thickness (mm)", 0, 100, 20),
        int("Insulin", "Insulin Level (μU/mL)", 0, 900, 100),
        real("BMI", "BMI", 0.0, 70.0, 0.1, 25.0),
        real("DiabetesPedigreeFunction", "Diabetes Pedigree Function", 0.0, 3.0, 0.01, 0.5),
        int("Age", "Age (years)", 1, 120, 30),
    ],
};

pub static HEART: FeatureSchema = FeatureSchema {
    fields: &[
        int("age", "Age", 1, 120, 50),
        choice("sex", "Sex", &[(0, "Female"), (1, "Male")]),
        choice(
            "cp",
            "Chest Pain Type",
            &[
                (0, "Typical Angina"),
                (1, "Atypical Angina"),
                (2, "Non-anginal Pain"),
                (3, "Asymptomatic"),
            ],
        ),
        int("trestbps", "Resting Blood Pressure (mmHg)", 80, 200, 120),
        int("chol", "Cholesterol (mg/dl)", 100, 600, 200),
        choice("fbs", "Fasting Blood Sugar > 120 mg/dl", NO_YES),
        choice(
            "restecg",
            "Resting ECG",
            &[(0, "Normal"), (1, "ST-T Abnormality"), (2, "LV Hypertrophy")],
        ),
        int("thalach", "Max Heart Rate", 60, 220, 150),
        choice("exang", "Exercise Induced Angina", NO_YES),
        real("oldpeak", "ST Depression", 0.0, 10.0, 0.1, 1.0),
        choice(
            "slope",
            "Slope of Peak Exercise ST",
            &[(0, "Upsloping"), (1, "Flat"), (2, "Downsloping")],
        ),
        choice("ca", "Major Vessels (0-3)", &[(0, "0"), (1, "1"), (2, "2"), (3, "3")]),
        choice(
            "thal",
            "Thalassemia",
            &[(0, "Normal"), (1, "Fixed Defect"), (2, "Reversible Defect")],
        ),
    ],
};

pub static PARKINSONS: FeatureSchema = FeatureSchema {
    fields: &[
        free("fo", "MDVP:Fo(Hz)", 150.0),
        free("fhi", "MDVP:Fhi(Hz)", 200.0),
        free("flo", "MDVP:Flo(Hz)", 100.0),
        free("Jitter_percent", "MDVP:Jitter(%)", 0.005),
        free("Jitter_Abs", "MDVP:Jitter(Abs)", 0.00003),
        free("RAP", "MDVP:RAP", 0.002),
        free("PPQ", "MDVP:PPQ", 0.002),
        free("DDP", "Jitter:DDP", 0.006),
        free("Shimmer", "MDVP:Shimmer", 0.03),
        free("Shimmer_dB", "MDVP:Shimmer(dB)", 0.3),
        free("APQ3", "Shimmer:APQ3", 0.01),
        free("APQ5", "Shimmer:APQ5", 0.01),
        free("APQ", "MDVP:APQ", 0.02),
        free("DDA", "Shimmer:DDA", 0.03),
        free("NHR", "NHR", 0.02),
        free("HNR", "HNR", 20.0),
        free("RPDE", "RPDE", 0.5),
        free("DFA", "DFA", 0.7),
        free("spread1", "spread1", -5.0),
        free("spread2", "spread2", 0.2),
        free("D2", "D2", 2.0),
        free("PPE", "PPE", 0.2),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawValues {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_schema_widths() {
        assert_eq!(Condition::Diabetes.schema().len(), 8);
        assert_eq!(Condition::Heart.schema().len(), 13);
        assert_eq!(Condition::Parkinsons.schema().len(), 22);
    }

    #[test]
    fn test_schema_order_matches_fitted_order() {
        let heart: Vec<_> = HEART.names().collect();
        assert_eq!(
            heart,
            [
                "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang",
                "oldpeak", "slope", "ca", "thal"
            ]
        );

        let diabetes: Vec<_> = DIABETES.names().collect();
        assert_eq!(diabetes.first(), Some(&"Pregnancies"));
        assert_eq!(diabetes.last(), Some(&"Age"));

        let parkinsons: Vec<_> = PARKINSONS.names().collect();
        assert_eq!(&parkinsons[..3], ["fo", "fhi", "flo"]);
        assert_eq!(parkinsons[21], "PPE");
    }

    #[test]
    fn test_field_keys_unique() {
        for condition in Condition::ALL {
            let schema = condition.schema();
            let mut names: Vec<_> = schema.names().collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), schema.len(), "{} has duplicate keys", condition);
        }
    }

    #[test]
    fn test_slug_round_trip() {
        for condition in Condition::ALL {
            assert_eq!(condition.slug().parse::<Condition>(), Ok(condition));
        }
        assert!("cancer".parse::<Condition>().is_err());
    }

    #[test]
    fn test_defaults_collect_in_order() {
        for condition in Condition::ALL {
            let schema = condition.schema();
            let vector = schema.collect(&schema.default_values()).unwrap();
            assert_eq!(vector, schema.defaults());
        }
    }

    #[test]
    fn test_choice_defaults_to_first_option() {
        assert_eq!(HEART.field("sex").unwrap().default, 0.0);
        assert_eq!(HEART.field("cp").unwrap().default, 0.0);
    }

    #[test]
    fn test_integer_clamped_to_bounds() {
        let glucose = DIABETES.field("Glucose").unwrap();
        assert_eq!(glucose.parse("450"), Ok(300.0));
        assert_eq!(glucose.parse("-5"), Ok(0.0));
        assert_eq!(glucose.parse(" 130 "), Ok(130.0));
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let age = DIABETES.field("Age").unwrap();
        assert!(matches!(age.parse("30.5"), Err(PredictionError::NotInteger { .. })));
        assert_eq!(age.parse("30.0"), Ok(30.0));
    }

    #[test]
    fn test_real_clamped_and_unbounded() {
        let bmi = DIABETES.field("BMI").unwrap();
        assert_eq!(bmi.parse("82.5"), Ok(70.0));

        let spread1 = PARKINSONS.field("spread1").unwrap();
        assert_eq!(spread1.parse("-7.25"), Ok(-7.25));
        assert_eq!(spread1.parse("1e3"), Ok(1000.0));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let glucose = DIABETES.field("Glucose").unwrap();
        assert!(matches!(glucose.parse("abc"), Err(PredictionError::NotNumeric { .. })));
        assert!(matches!(glucose.parse(""), Err(PredictionError::MissingField(_))));
        assert!(matches!(glucose.parse("NaN"), Err(PredictionError::NotFinite { .. })));
        assert!(matches!(glucose.parse("inf"), Err(PredictionError::NotFinite { .. })));
    }

    #[test]
    fn test_choice_rejects_unknown_code() {
        let cp = HEART.field("cp").unwrap();
        assert_eq!(cp.parse("3"), Ok(3.0));
        assert!(matches!(cp.parse("4"), Err(PredictionError::NotAnOption { .. })));
        assert!(matches!(cp.parse("1.5"), Err(PredictionError::NotAnOption { .. })));
    }

    #[test]
    fn test_collect_ignores_submission_order() {
        let values = raw(&[
            ("Age", "30"),
            ("BMI", "25.0"),
            ("Pregnancies", "0"),
            ("Insulin", "100"),
            ("Glucose", "120"),
            ("DiabetesPedigreeFunction", "0.5"),
            ("SkinThickness", "20"),
            ("BloodPressure", "80"),
            ("unrelated", "x"),
        ]);
        let vector = DIABETES.collect(&values).unwrap();
        assert_eq!(vector, vec![0.0, 120.0, 80.0, 20.0, 100.0, 25.0, 0.5, 30.0]);
    }

    #[test]
    fn test_collect_reports_missing_field() {
        let mut values = DIABETES.default_values();
        values.remove("Insulin");
        assert_eq!(
            DIABETES.collect(&values),
            Err(PredictionError::MissingField("Insulin".to_string()))
        );
    }

    #[test]
    fn test_format_value() {
        assert_eq!(DIABETES.field("Glucose").unwrap().format_value(120.0), "120");
        assert_eq!(PARKINSONS.field("Jitter_Abs").unwrap().format_value(0.00003), "0.00003");
        assert_eq!(PARKINSONS.field("fo").unwrap().format_value(150.0), "150");
    }
}
