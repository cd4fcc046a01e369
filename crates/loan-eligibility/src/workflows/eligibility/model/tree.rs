use serde::{Deserialize, Serialize};

use super::{Classifier, PredictionError};
use crate::workflows::eligibility::domain::FeatureRow;

/// Node of a flattened binary decision tree; children are indices into `nodes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Rows with `row[feature] <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        label: u8,
    },
}

/// Decision tree classifier, root at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub feature_names: Vec<String>,
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn classify(&self, row: &FeatureRow) -> Result<u8, PredictionError> {
        let mut index = 0;
        // A well-formed tree never visits more nodes than it has.
        for _ in 0..=self.nodes.len() {
            let node = self.nodes.get(index).ok_or_else(|| {
                PredictionError::Malformed(format!("node {index} does not exist"))
            })?;

            match node {
                TreeNode::Leaf { label } => return Ok(*label),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = row.get(*feature).ok_or(PredictionError::ShapeMismatch {
                        expected: feature + 1,
                        found: row.len(),
                    })?;
                    if value.is_nan() {
                        return Err(PredictionError::Numeric(format!(
                            "feature {feature} is NaN"
                        )));
                    }
                    index = if value <= threshold { *left } else { *right };
                }
            }
        }

        Err(PredictionError::Malformed(
            "tree contains a cycle".to_string(),
        ))
    }
}

impl Classifier for DecisionTree {
    fn kind(&self) -> &'static str {
        "decision_tree"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, batch: &[FeatureRow]) -> Result<Vec<u8>, PredictionError> {
        batch.iter().map(|row| self.classify(row)).collect()
    }
}
