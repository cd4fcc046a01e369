use serde::{Deserialize, Serialize};

use super::{Classifier, PredictionError};
use crate::workflows::eligibility::domain::FeatureRow;

fn default_threshold() -> f64 {
    0.5
}

/// Standardization applied to each column before the linear term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Binary logistic regression exported from a trained pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub scaler: Option<FeatureScaler>,
}

impl LogisticRegression {
    /// Positive-class probability for a single row.
    pub fn probability(&self, row: &FeatureRow) -> Result<f64, PredictionError> {
        if self.coefficients.len() != row.len() {
            return Err(PredictionError::ShapeMismatch {
                expected: self.coefficients.len(),
                found: row.len(),
            });
        }

        let mut logit = self.intercept;
        for (index, (value, weight)) in row.iter().zip(&self.coefficients).enumerate() {
            logit += self.scaled(index, *value)? * weight;
        }

        if !logit.is_finite() {
            return Err(PredictionError::Numeric(format!("logit evaluated to {logit}")));
        }

        Ok(1.0 / (1.0 + (-logit).exp()))
    }

    fn scaled(&self, index: usize, value: f64) -> Result<f64, PredictionError> {
        let Some(scaler) = &self.scaler else {
            return Ok(value);
        };

        let (Some(mean), Some(scale)) = (scaler.mean.get(index), scaler.scale.get(index)) else {
            return Err(PredictionError::Malformed(format!(
                "scaler has no entry for column {index}"
            )));
        };

        if *scale == 0.0 {
            return Ok(value - mean);
        }
        Ok((value - mean) / scale)
    }
}

impl Classifier for LogisticRegression {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, batch: &[FeatureRow]) -> Result<Vec<u8>, PredictionError> {
        batch
            .iter()
            .map(|row| {
                self.probability(row)
                    .map(|probability| u8::from(probability >= self.threshold))
            })
            .collect()
    }
}
