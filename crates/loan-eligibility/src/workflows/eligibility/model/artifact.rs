use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::repository::{ArtifactLoader, ModelLoadError};
use super::{Classifier, DecisionTree, LogisticRegression, PredictionError};
use crate::workflows::eligibility::domain::FeatureRow;

/// Serialized classifier, tagged by backend.
///
/// ```json
/// { "kind": "logistic_regression", "feature_names": [...], "coefficients": [...], "intercept": -1.2 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
}

impl ModelArtifact {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    fn backend(&self) -> &dyn Classifier {
        match self {
            ModelArtifact::LogisticRegression(model) => model as &dyn Classifier,
            ModelArtifact::DecisionTree(model) => model as &dyn Classifier,
        }
    }
}

impl Classifier for ModelArtifact {
    fn kind(&self) -> &'static str {
        self.backend().kind()
    }

    fn feature_names(&self) -> &[String] {
        self.backend().feature_names()
    }

    fn predict(&self, batch: &[FeatureRow]) -> Result<Vec<u8>, PredictionError> {
        self.backend().predict(batch)
    }
}

/// Reads a JSON [`ModelArtifact`] from a fixed path.
#[derive(Debug, Clone)]
pub struct JsonArtifactLoader {
    path: PathBuf,
}

impl JsonArtifactLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArtifactLoader for JsonArtifactLoader {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Arc<dyn Classifier>, ModelLoadError> {
        let path = self.describe();
        let bytes = std::fs::read(&self.path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ModelLoadError::NotFound { path: path.clone() },
            _ => ModelLoadError::Io {
                path: path.clone(),
                reason: err.to_string(),
            },
        })?;

        let artifact =
            ModelArtifact::from_json_slice(&bytes).map_err(|err| ModelLoadError::Corrupt {
                path,
                reason: err.to_string(),
            })?;

        Ok(Arc::new(artifact))
    }
}
