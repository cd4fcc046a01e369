use loan_eligibility::config::AppConfig;
use loan_eligibility::workflows::eligibility::{EligibilityService, JsonArtifactLoader};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type LoanService = EligibilityService<JsonArtifactLoader>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Apply a command line model override on top of the loaded configuration.
pub(crate) fn apply_model_override(config: &mut AppConfig, model: Option<PathBuf>) {
    if let Some(path) = model {
        config.model.artifact_path = path;
    }
}

/// Service backed by the configured JSON artifact. Nothing is read until the
/// first assessment or an explicit warm-up.
pub(crate) fn loan_service(config: &AppConfig) -> Arc<LoanService> {
    let loader = JsonArtifactLoader::new(config.model.artifact_path.clone());
    Arc::new(EligibilityService::from_loader(loader))
}
