//! Loan eligibility intake: form validation, category encoding, classifier
//! inference, and applicant-facing decision messages.
//!
//! A request flows through [`builder::ProfileBuilder`] into a ten-column
//! feature record, is scored by the cached classifier held in
//! [`model::ModelRepository`], and is rendered by [`presenter::present`].

pub mod batch;
pub mod builder;
pub mod domain;
pub mod duration;
pub mod encoding;
pub mod inference;
pub mod model;
pub mod presenter;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use batch::{BatchError, BatchOutcome, BatchScorer};
pub use builder::{
    assert_schema, FieldIssue, IssueKind, ProfileBuilder, SchemaMismatch, ValidationError,
};
pub use domain::{
    ApplicantProfile, ApplicationForm, Decision, FeatureRow, FEATURE_COUNT, FEATURE_SCHEMA,
};
pub use duration::{resolve_term, DurationSelection, DEFAULT_TERM, DURATION_LABELS, TERM_VALUES};
pub use encoding::{InvalidCategoryError, OptionSet};
pub use inference::{InferenceEngine, InferenceError};
pub use model::{
    ArtifactLoader, Classifier, JsonArtifactLoader, ModelArtifact, ModelLoadError,
    ModelRepository, PredictionError,
};
pub use presenter::{present, present_failure, present_malformed, Message, Tone};
pub use router::{eligibility_router, option_catalog};
pub use service::{Assessment, EligibilityError, EligibilityService, ModelStatusView, PipelineStage};
