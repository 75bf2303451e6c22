//! Classifier Module - Prediction Engine
//!
//! Loads the serialized CKD decision-tree artifact and turns validated
//! assessment requests into two-way outcomes. Kept separate from the
//! HTTP handlers so the artifact format can be swapped without touching
//! the web surface.

pub mod artifact;
pub mod registry;

pub use artifact::{Artifact, TreeNode};

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::{Assessment, AssessmentRequest, FeatureRecord, FeatureValue, Outcome};

/// Any fault raised while loading the artifact or predicting on a
/// record. Callers surface these as a single "invocation failure"
/// category; the variants exist so the fault text names the cause.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("model artifact not found: {0}")]
    ArtifactMissing(String),

    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model artifact: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("record has no feature named '{0}'")]
    SchemaMismatch(String),

    #[error("feature '{0}' does not match the trained type")]
    TypeMismatch(String),

    #[error("value '{value}' of feature '{feature}' is outside the trained vocabulary")]
    UnknownCategory { feature: String, value: String },

    #[error("classifier produced no label")]
    EmptyPrediction,

    #[error("predicted label '{0}' is not a recognized outcome token")]
    UnknownLabel(String),
}

/// Artifact metadata, stamped at load time.
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,
    pub features: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Status payload for the UI sidebar.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub model_loaded: bool,
    pub model_path: String,
    pub model_type: String,
    pub feature_count: usize,
    pub positive_label: String,
    pub loaded_at: DateTime<Utc>,
}

/// A loaded, validated classifier. Immutable after construction; one
/// instance is shared read-only by every request for the process
/// lifetime (see [`registry`]).
#[derive(Debug)]
pub struct Classifier {
    artifact: Artifact,
    metadata: ModelMetadata,
}

impl Classifier {
    /// Load and validate an artifact from disk.
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::ArtifactMissing(
                path.display().to_string(),
            ));
        }

        let raw = std::fs::read_to_string(path)?;
        let artifact: Artifact = serde_json::from_str(&raw)?;
        Self::from_artifact(artifact, &path.display().to_string())
    }

    /// Build a classifier from an already-deserialized artifact.
    pub fn from_artifact(artifact: Artifact, path: &str) -> Result<Self, ClassifierError> {
        artifact.validate()?;

        let metadata = ModelMetadata {
            model_path: path.to_string(),
            model_type: artifact.model_type.clone(),
            features: artifact.features.len(),
            loaded_at: Utc::now(),
        };

        Ok(Self { artifact, metadata })
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn status(&self) -> ModelStatus {
        ModelStatus {
            model_loaded: true,
            model_path: self.metadata.model_path.clone(),
            model_type: self.metadata.model_type.clone(),
            feature_count: self.metadata.features,
            positive_label: self.artifact.positive_label.clone(),
            loaded_at: self.metadata.loaded_at,
        }
    }

    /// Run one prediction. Returns the sequence of predicted labels;
    /// the tree emits exactly one.
    pub fn predict(&self, record: &FeatureRecord) -> Result<Vec<String>, ClassifierError> {
        let mut index = 0;
        // Bounded walk: validation does not prove the tree acyclic.
        for _ in 0..=self.artifact.nodes.len() {
            match &self.artifact.nodes[index] {
                TreeNode::Leaf { label } => return Ok(vec![label.clone()]),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = self.encoded_value(record, feature)?;
                    index = if value <= *threshold { *left } else { *right };
                }
            }
        }

        Err(ClassifierError::InvalidArtifact(
            "tree walk did not reach a leaf".to_string(),
        ))
    }

    /// Full invocation boundary: convert the request to the trained
    /// schema, predict, and map the label to an outcome. A label that
    /// is neither trained token is a fault, never a silent negative.
    pub fn assess(&self, request: &AssessmentRequest) -> Result<Assessment, ClassifierError> {
        let record = FeatureRecord::from(request);
        let labels = self.predict(&record)?;
        let label = labels.first().ok_or(ClassifierError::EmptyPrediction)?;

        let outcome = if *label == self.artifact.positive_label {
            Outcome::Positive
        } else if *label == self.artifact.negative_label {
            Outcome::Negative
        } else {
            return Err(ClassifierError::UnknownLabel(label.clone()));
        };

        Ok(Assessment {
            outcome,
            label: label.clone(),
        })
    }

    /// Resolve one trained feature against the record, applying the
    /// artifact's categorical encoding where one is declared.
    fn encoded_value(
        &self,
        record: &FeatureRecord,
        feature: &str,
    ) -> Result<f64, ClassifierError> {
        let value = record
            .feature(feature)
            .ok_or_else(|| ClassifierError::SchemaMismatch(feature.to_string()))?;

        match (value, self.artifact.encodings.get(feature)) {
            (FeatureValue::Numeric(n), None) => Ok(n),
            (FeatureValue::Category(c), Some(encoding)) => encoding.get(&c).copied().ok_or(
                ClassifierError::UnknownCategory {
                    feature: feature.to_string(),
                    value: c,
                },
            ),
            _ => Err(ClassifierError::TypeMismatch(feature.to_string())),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_fixtures::{ckd_artifact, ckd_classifier};
    use super::*;
    use crate::models::SPECIFIC_GRAVITY_OPTIONS;

    fn request(json: serde_json::Value) -> AssessmentRequest {
        serde_json::from_value(json).unwrap()
    }

    fn healthy_request() -> AssessmentRequest {
        request(serde_json::json!({
            "hemoglobin": 13.5,
            "specific_gravity": 1.020,
            "albumin": 1,
            "serum_creatinine": 1.2,
            "hypertension": "no",
            "diabetes_mellitus": "no"
        }))
    }

    #[test]
    fn test_healthy_profile_is_negative() {
        let classifier = ckd_classifier();
        let assessment = classifier.assess(&healthy_request()).unwrap();
        assert_eq!(assessment.outcome, Outcome::Negative);
        assert_eq!(assessment.label, "notckd");
    }

    #[test]
    fn test_anemic_profile_is_positive() {
        let classifier = ckd_classifier();
        let assessment = classifier
            .assess(&request(serde_json::json!({
                "hemoglobin": 8.0,
                "specific_gravity": 1.010,
                "albumin": 4,
                "serum_creatinine": 6.8,
                "hypertension": "yes",
                "diabetes_mellitus": "yes"
            })))
            .unwrap();
        assert_eq!(assessment.outcome, Outcome::Positive);
        assert_eq!(assessment.label, "ckd");
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let classifier = ckd_classifier();
        let record = FeatureRecord::from(&healthy_request());
        let first = classifier.predict(&record).unwrap();
        for _ in 0..5 {
            assert_eq!(classifier.predict(&record).unwrap(), first);
        }
    }

    #[test]
    fn test_predict_emits_exactly_one_label() {
        let classifier = ckd_classifier();
        let labels = classifier
            .predict(&FeatureRecord::from(&healthy_request()))
            .unwrap();
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn test_boundary_values_predict_without_fault() {
        let classifier = ckd_classifier();
        let assessment = classifier
            .assess(&request(serde_json::json!({
                "hemoglobin": 3.0,
                "specific_gravity": 1.005,
                "albumin": 5,
                "serum_creatinine": 15.0,
                "hypertension": "yes",
                "diabetes_mellitus": "yes"
            })))
            .unwrap();
        assert!(matches!(
            assessment.outcome,
            Outcome::Positive | Outcome::Negative
        ));
    }

    #[test]
    fn test_every_domain_combination_yields_an_outcome() {
        let classifier = ckd_classifier();
        for hemoglobin in [3.0, 7.5, 12.9, 13.0, 18.0] {
            for specific_gravity in SPECIFIC_GRAVITY_OPTIONS {
                for albumin in 0..=5u8 {
                    for serum_creatinine in [0.1, 1.4, 2.1, 15.0] {
                        for hypertension in ["yes", "no"] {
                            for diabetes_mellitus in ["yes", "no"] {
                                let assessment = classifier
                                    .assess(&request(serde_json::json!({
                                        "hemoglobin": hemoglobin,
                                        "specific_gravity": specific_gravity,
                                        "albumin": albumin,
                                        "serum_creatinine": serum_creatinine,
                                        "hypertension": hypertension,
                                        "diabetes_mellitus": diabetes_mellitus
                                    })))
                                    .unwrap();
                                assert!(matches!(
                                    assessment.outcome,
                                    Outcome::Positive | Outcome::Negative
                                ));
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_mixed_case_categoricals_match_lowercase() {
        let classifier = ckd_classifier();
        let mixed = classifier
            .assess(&request(serde_json::json!({
                "hemoglobin": 13.5,
                "specific_gravity": 1.020,
                "albumin": 1,
                "serum_creatinine": 1.2,
                "hypertension": "No",
                "diabetes_mellitus": "NO"
            })))
            .unwrap();
        let lower = classifier.assess(&healthy_request()).unwrap();
        assert_eq!(mixed.outcome, lower.outcome);
        assert_eq!(mixed.label, lower.label);
    }

    #[test]
    fn test_unknown_category_is_a_fault() {
        let classifier = ckd_classifier();
        let mut record = FeatureRecord::from(&healthy_request());
        record.hypertension = "maybe".to_string();
        // Force the walk down the branch that consults hypertension.
        record.hemoglobin = 12.0;
        record.specific_gravity = 1.020;
        record.serum_creatinine = 1.2;
        let err = classifier.predict(&record).unwrap_err();
        assert!(matches!(err, ClassifierError::UnknownCategory { .. }));
        assert!(err.to_string().contains("maybe"));
    }

    #[test]
    fn test_untrained_feature_is_a_schema_mismatch() {
        let mut artifact = ckd_artifact();
        artifact.features.push("packed_cell_volume".to_string());
        artifact.nodes[0] = TreeNode::Split {
            feature: "packed_cell_volume".to_string(),
            threshold: 30.0,
            left: 1,
            right: 2,
        };
        let classifier = Classifier::from_artifact(artifact, "<test>").unwrap();

        let err = classifier
            .predict(&FeatureRecord::from(&healthy_request()))
            .unwrap_err();
        assert!(matches!(err, ClassifierError::SchemaMismatch(_)));
        assert!(err.to_string().contains("packed_cell_volume"));
    }

    #[test]
    fn test_numeric_feature_with_encoding_is_a_type_mismatch() {
        let mut artifact = ckd_artifact();
        artifact
            .encodings
            .insert("hemoglobin".to_string(), [("low".to_string(), 0.0)].into());
        let classifier = Classifier::from_artifact(artifact, "<test>").unwrap();

        let err = classifier
            .predict(&FeatureRecord::from(&healthy_request()))
            .unwrap_err();
        assert!(matches!(err, ClassifierError::TypeMismatch(_)));
    }

    #[test]
    fn test_unrecognized_label_is_a_fault_not_a_negative() {
        let mut artifact = ckd_artifact();
        for node in &mut artifact.nodes {
            if let TreeNode::Leaf { label } = node {
                if label == "notckd" {
                    *label = "unsure".to_string();
                }
            }
        }
        let classifier = Classifier::from_artifact(artifact, "<test>").unwrap();

        let err = classifier.assess(&healthy_request()).unwrap_err();
        assert!(matches!(err, ClassifierError::UnknownLabel(_)));
        assert!(err.to_string().contains("unsure"));
    }

    #[test]
    fn test_status_reflects_loaded_artifact() {
        let classifier = ckd_classifier();
        let status = classifier.status();
        assert!(status.model_loaded);
        assert_eq!(status.model_type, "decision_tree");
        assert_eq!(status.feature_count, 6);
        assert_eq!(status.positive_label, "ckd");
    }
}
