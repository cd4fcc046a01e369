//! Classifier abstraction and the artifact formats the service can load.

mod artifact;
mod logistic;
mod repository;
mod tree;

pub use artifact::{JsonArtifactLoader, ModelArtifact};
pub use logistic::LogisticRegression;
pub use repository::{ArtifactLoader, ModelLoadError, ModelRepository};
pub use tree::{DecisionTree, TreeNode};

use super::domain::FeatureRow;

/// Narrow interface every model backend implements.
///
/// Implementations must be safe for concurrent read-only use; the repository
/// hands the same instance to every request.
pub trait Classifier: Send + Sync {
    /// Short backend identifier, e.g. `logistic_regression`.
    fn kind(&self) -> &'static str;

    /// Column names the model was fitted on, in order.
    fn feature_names(&self) -> &[String];

    /// Predict one class label per input row.
    fn predict(&self, batch: &[FeatureRow]) -> Result<Vec<u8>, PredictionError>;
}

/// Failure raised by a model while scoring a batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("model expects {expected} features per row, received {found}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("non-finite value produced while scoring: {0}")]
    Numeric(String),
    #[error("malformed model structure: {0}")]
    Malformed(String),
}
