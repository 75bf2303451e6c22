//! On-disk model artifact schema
//!
//! The artifact is a JSON-serialized decision tree exported from the
//! training pipeline: the trained feature list, the categorical value
//! encodings, the two label tokens, and the split nodes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ClassifierError;

/// Artifact format this build understands.
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// A single node of the decision tree. Node references are indices into
/// the artifact's flat `nodes` array; index 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Branch left when the encoded feature value is <= threshold.
    Split {
        feature: String,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        label: String,
    },
}

/// Deserialized model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub format_version: u32,
    pub model_type: String,

    /// Feature names the tree splits on, exactly as trained.
    pub features: Vec<String>,

    /// Per-feature encoding for categorical features. Features absent
    /// from this map are numeric.
    #[serde(default)]
    pub encodings: BTreeMap<String, BTreeMap<String, f64>>,

    /// Label token the model emits for the disease-positive class.
    pub positive_label: String,

    /// Label token for the disease-negative class.
    pub negative_label: String,

    pub nodes: Vec<TreeNode>,
}

impl Artifact {
    /// Structural validation, run once at load time so prediction can
    /// index nodes without re-checking.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(ClassifierError::InvalidArtifact(format!(
                "unsupported format version {} (expected {})",
                self.format_version, SUPPORTED_FORMAT_VERSION
            )));
        }

        if self.nodes.is_empty() {
            return Err(ClassifierError::InvalidArtifact(
                "artifact contains no tree nodes".to_string(),
            ));
        }

        if self.features.is_empty() {
            return Err(ClassifierError::InvalidArtifact(
                "artifact declares no features".to_string(),
            ));
        }

        if self.positive_label == self.negative_label {
            return Err(ClassifierError::InvalidArtifact(
                "positive and negative labels are identical".to_string(),
            ));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *left >= self.nodes.len() || *right >= self.nodes.len() {
                    return Err(ClassifierError::InvalidArtifact(format!(
                        "node {} references a child outside the tree",
                        index
                    )));
                }
                if !self.features.iter().any(|f| f == feature) {
                    return Err(ClassifierError::InvalidArtifact(format!(
                        "node {} splits on undeclared feature '{}'",
                        index, feature
                    )));
                }
            }
        }

        for (feature, encoding) in &self.encodings {
            if encoding.is_empty() {
                return Err(ClassifierError::InvalidArtifact(format!(
                    "feature '{}' has an empty encoding table",
                    feature
                )));
            }
        }

        Ok(())
    }
}
