use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::builder::{assert_schema, ProfileBuilder, SchemaMismatch, ValidationError};
use super::domain::{ApplicantProfile, ApplicationForm, Decision};
use super::inference::{self, InferenceEngine, InferenceError};
use super::model::{ArtifactLoader, ModelRepository};
use super::presenter::{present, Message};

/// Steps a single submission moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Collecting,
    Validating,
    Encoding,
    Inferring,
    Presenting,
}

impl PipelineStage {
    pub const fn label(self) -> &'static str {
        match self {
            PipelineStage::Collecting => "collecting",
            PipelineStage::Validating => "validating",
            PipelineStage::Encoding => "encoding",
            PipelineStage::Inferring => "inferring",
            PipelineStage::Presenting => "presenting",
        }
    }
}

/// Successful outcome of a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub decision: Decision,
    pub message: Message,
    pub profile: ApplicantProfile,
    pub assessed_at: DateTime<Utc>,
}

/// Terminal failure of a submission. Nothing is retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EligibilityError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Schema(#[from] SchemaMismatch),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl EligibilityError {
    /// Stage at which the request stopped.
    pub const fn stage(&self) -> PipelineStage {
        match self {
            EligibilityError::Validation(_) => PipelineStage::Validating,
            EligibilityError::Schema(_) | EligibilityError::Inference(_) => {
                PipelineStage::Inferring
            }
        }
    }
}

/// Read-only description of the loaded model for status endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStatusView {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub feature_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Composes validation, encoding, inference, and presentation per submission.
pub struct EligibilityService<L> {
    builder: ProfileBuilder,
    engine: InferenceEngine<L>,
}

impl<L> EligibilityService<L>
where
    L: ArtifactLoader + 'static,
{
    pub fn new(repository: Arc<ModelRepository<L>>) -> Self {
        Self {
            builder: ProfileBuilder::default(),
            engine: InferenceEngine::new(repository),
        }
    }

    pub fn from_loader(loader: L) -> Self {
        Self::new(Arc::new(ModelRepository::new(loader)))
    }

    /// Attempt the one-time model load ahead of the first request.
    pub fn warm_up(&self) -> bool {
        self.engine.model().is_ok()
    }

    /// Run one form through the pipeline.
    pub fn assess(&self, form: &ApplicationForm) -> Result<Assessment, EligibilityError> {
        trace_stage(PipelineStage::Collecting);

        trace_stage(PipelineStage::Validating);
        let profile = self.builder.build(form).map_err(|err| {
            warn!(fields = ?err.fields(), "application form rejected");
            EligibilityError::from(err)
        })?;

        trace_stage(PipelineStage::Encoding);
        debug!(features = ?profile.named_features(), "feature record assembled");

        trace_stage(PipelineStage::Inferring);
        let decision = self.infer(&profile).map_err(|err| {
            warn!(error = %err, "inference failed");
            err
        })?;

        trace_stage(PipelineStage::Presenting);
        let message = present(decision, form.full_name.trim(), form.account_number.trim());
        info!(eligible = decision.is_eligible(), "eligibility assessed");

        Ok(Assessment {
            decision,
            message,
            profile,
            assessed_at: Utc::now(),
        })
    }

    fn infer(&self, profile: &ApplicantProfile) -> Result<Decision, EligibilityError> {
        let model = self.engine.model()?;
        assert_schema(model.feature_names())?;
        Ok(inference::predict(profile, model.as_ref())?)
    }

    pub fn model_status(&self) -> ModelStatusView {
        match self.engine.model() {
            Ok(model) => ModelStatusView {
                status: "ready",
                kind: Some(model.kind()),
                feature_names: model.feature_names().to_vec(),
                reason: None,
            },
            Err(err) => ModelStatusView {
                status: "unavailable",
                kind: None,
                feature_names: Vec::new(),
                reason: Some(err.to_string()),
            },
        }
    }

    pub fn repository(&self) -> &ModelRepository<L> {
        self.engine.repository()
    }
}

fn trace_stage(stage: PipelineStage) {
    debug!(stage = stage.label(), "eligibility pipeline");
}
