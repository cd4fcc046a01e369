use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::domain::{ApplicantProfile, Decision};
use super::model::{ArtifactLoader, Classifier, ModelLoadError, ModelRepository, PredictionError};

/// Failures surfaced by the inference boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("inference unavailable: {0}")]
    Unavailable(ModelLoadError),
    #[error("model prediction failed: {0}")]
    Model(PredictionError),
    #[error("model panicked during prediction: {0}")]
    Panicked(String),
    #[error("model returned no prediction for the submitted row")]
    EmptyOutput,
    #[error("model returned label {0}, expected 0 or 1")]
    UnexpectedLabel(u8),
}

impl InferenceError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, InferenceError::Unavailable(_))
    }
}

/// Gives the pipeline access to the cached classifier.
pub struct InferenceEngine<L> {
    repository: Arc<ModelRepository<L>>,
}

impl<L> InferenceEngine<L>
where
    L: ArtifactLoader,
{
    pub fn new(repository: Arc<ModelRepository<L>>) -> Self {
        Self { repository }
    }

    /// The loaded classifier, or `Unavailable` when the artifact never loaded.
    pub fn model(&self) -> Result<Arc<dyn Classifier>, InferenceError> {
        self.repository.load().map_err(InferenceError::Unavailable)
    }

    pub fn repository(&self) -> &ModelRepository<L> {
        &self.repository
    }

    /// Load (or reuse) the model and score the profile.
    pub fn predict(&self, profile: &ApplicantProfile) -> Result<Decision, InferenceError> {
        let model = self.model()?;
        predict(profile, model.as_ref())
    }
}

/// Score one profile as a single-row batch and take the first label.
pub fn predict(
    profile: &ApplicantProfile,
    model: &dyn Classifier,
) -> Result<Decision, InferenceError> {
    let batch = [profile.feature_row()];

    let labels = panic::catch_unwind(AssertUnwindSafe(|| model.predict(&batch)))
        .map_err(|payload| InferenceError::Panicked(panic_message(payload)))?
        .map_err(InferenceError::Model)?;

    let label = labels.first().copied().ok_or(InferenceError::EmptyOutput)?;
    Decision::from_label(label).ok_or(InferenceError::UnexpectedLabel(label))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
