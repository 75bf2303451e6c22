//! Assessment request and outcome types

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

/// Specific gravity is reported in fixed steps on urinalysis strips;
/// the classifier was trained on exactly these five values.
pub const SPECIFIC_GRAVITY_OPTIONS: [f64; 5] = [1.005, 1.010, 1.015, 1.020, 1.025];

/// Binary clinical diagnosis flag.
///
/// Accepts any letter case on input ("Yes", "yes", "YES") and always
/// normalizes to the lowercase token the classifier was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    /// Lowercase token matching the training data encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "yes",
            YesNo::No => "no",
        }
    }
}

impl<'de> Deserialize<'de> for YesNo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        match raw.to_ascii_lowercase().as_str() {
            "yes" => Ok(YesNo::Yes),
            "no" => Ok(YesNo::No),
            _ => Err(serde::de::Error::unknown_variant(&raw, &["yes", "no"])),
        }
    }
}

/// One screening submission: the six clinical fields the form collects.
///
/// The form widgets already constrain every field to its domain; these
/// validation rules re-apply the same domains at the HTTP boundary, since
/// the API can be called without the form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssessmentRequest {
    /// Hemoglobin (g/dl)
    #[validate(range(min = 3.0, max = 18.0))]
    pub hemoglobin: f64,

    /// Urine specific gravity
    #[validate(custom(function = validate_specific_gravity))]
    pub specific_gravity: f64,

    /// Urine albumin grade (0-5)
    #[validate(range(min = 0, max = 5))]
    pub albumin: u8,

    /// Serum creatinine (mg/dl)
    #[validate(range(min = 0.1, max = 15.0))]
    pub serum_creatinine: f64,

    /// Hypertension diagnosis
    pub hypertension: YesNo,

    /// Diabetes mellitus diagnosis
    pub diabetes_mellitus: YesNo,
}

fn validate_specific_gravity(value: f64) -> Result<(), ValidationError> {
    if SPECIFIC_GRAVITY_OPTIONS
        .iter()
        .any(|opt| (opt - value).abs() < 1e-9)
    {
        Ok(())
    } else {
        Err(ValidationError::new("specific_gravity")
            .with_message("must be one of 1.005, 1.010, 1.015, 1.020, 1.025".into()))
    }
}

/// A single value exposed to the classifier by name.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Category(String),
}

/// The fixed-schema record handed to the classifier for one prediction.
///
/// Field names match the columns the model artifact was trained on; the
/// two categorical fields are already lowercase. Built once per
/// submission, consumed once, discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub hemoglobin: f64,
    pub specific_gravity: f64,
    pub albumin: u8,
    pub serum_creatinine: f64,
    pub hypertension: String,
    pub diabetes_mellitus: String,
}

impl FeatureRecord {
    /// Resolve a trained feature name against this record.
    ///
    /// Returns `None` for a name the record does not carry, which the
    /// classifier reports as a schema mismatch.
    pub fn feature(&self, name: &str) -> Option<FeatureValue> {
        match name {
            "hemoglobin" => Some(FeatureValue::Numeric(self.hemoglobin)),
            "specific_gravity" => Some(FeatureValue::Numeric(self.specific_gravity)),
            "albumin" => Some(FeatureValue::Numeric(self.albumin as f64)),
            "serum_creatinine" => Some(FeatureValue::Numeric(self.serum_creatinine)),
            "hypertension" => Some(FeatureValue::Category(self.hypertension.clone())),
            "diabetes_mellitus" => Some(FeatureValue::Category(self.diabetes_mellitus.clone())),
            _ => None,
        }
    }
}

impl From<&AssessmentRequest> for FeatureRecord {
    fn from(req: &AssessmentRequest) -> Self {
        Self {
            hemoglobin: req.hemoglobin,
            specific_gravity: req.specific_gravity,
            albumin: req.albumin,
            serum_creatinine: req.serum_creatinine,
            hypertension: req.hypertension.as_str().to_string(),
            diabetes_mellitus: req.diabetes_mellitus.as_str().to_string(),
        }
    }
}

/// Two-way screening outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Positive,
    Negative,
}

impl Outcome {
    pub fn headline(&self) -> &'static str {
        match self {
            Outcome::Positive => "CKD Detected",
            Outcome::Negative => "No CKD Detected",
        }
    }

    /// Static advisory block shown with the outcome.
    pub fn advisory(&self) -> &'static [&'static str] {
        match self {
            Outcome::Positive => &[
                "Consult a nephrologist for a detailed examination.",
                "Follow a kidney-friendly diet.",
                "Monitor blood pressure and blood sugar levels.",
                "Stay hydrated as per medical advice.",
                "Avoid over-the-counter medications without approval.",
            ],
            Outcome::Negative => &[
                "Maintain a balanced diet.",
                "Drink adequate water throughout the day.",
                "Exercise regularly and manage stress.",
                "Attend routine health checkups.",
                "Avoid smoking and excessive alcohol use.",
            ],
        }
    }
}

/// Result of one classifier invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub outcome: Outcome,
    /// Raw label the classifier produced, for the response payload.
    pub label: String,
}

/// Response body for the assessment endpoint.
#[derive(Debug, Serialize)]
pub struct AssessResponse {
    pub outcome: Outcome,
    pub label: String,
    pub headline: &'static str,
    pub advisory: &'static [&'static str],
}

impl From<Assessment> for AssessResponse {
    fn from(assessment: Assessment) -> Self {
        Self {
            outcome: assessment.outcome,
            headline: assessment.outcome.headline(),
            advisory: assessment.outcome.advisory(),
            label: assessment.label,
        }
    }
}
