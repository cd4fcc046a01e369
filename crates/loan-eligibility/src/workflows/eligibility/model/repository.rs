use std::sync::{Arc, OnceLock};

use tracing::{error, info};

use super::Classifier;

/// Storage backend the repository reads the artifact from, exactly once.
pub trait ArtifactLoader: Send + Sync {
    /// Human readable location used in logs and errors.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Arc<dyn Classifier>, ModelLoadError>;
}

/// Reasons the artifact could not be made available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelLoadError {
    #[error("model artifact not found at {path}")]
    NotFound { path: String },
    #[error("model artifact at {path} could not be decoded: {reason}")]
    Corrupt { path: String, reason: String },
    #[error("model artifact at {path} could not be read: {reason}")]
    Io { path: String, reason: String },
}

/// Process-wide holder of the single classifier artifact.
///
/// The first `load` reads storage; every later call returns the cached
/// outcome, including a cached failure. There is no reload path: a missing
/// artifact stays unavailable until the process restarts.
pub struct ModelRepository<L> {
    loader: L,
    cached: OnceLock<Result<Arc<dyn Classifier>, ModelLoadError>>,
}

impl<L> ModelRepository<L>
where
    L: ArtifactLoader,
{
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            cached: OnceLock::new(),
        }
    }

    pub fn load(&self) -> Result<Arc<dyn Classifier>, ModelLoadError> {
        self.cached
            .get_or_init(|| {
                let location = self.loader.describe();
                let outcome = self.loader.load();
                match &outcome {
                    Ok(model) => info!(
                        location = %location,
                        kind = model.kind(),
                        features = model.feature_names().len(),
                        "model artifact loaded"
                    ),
                    Err(err) => error!(
                        location = %location,
                        error = %err,
                        "model artifact unavailable; inference disabled until restart"
                    ),
                }
                outcome
            })
            .clone()
    }

    /// Whether a load has been attempted, successful or not.
    pub fn is_initialized(&self) -> bool {
        self.cached.get().is_some()
    }
}
