use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::eligibility::domain::{ApplicationForm, FeatureRow, FEATURE_SCHEMA};
use crate::workflows::eligibility::duration::DurationSelection;
use crate::workflows::eligibility::model::{
    ArtifactLoader, Classifier, ModelLoadError, ModelRepository, PredictionError,
};
use crate::workflows::eligibility::service::EligibilityService;

pub(super) const ACCOUNT: &str = "12345678901";
pub(super) const NAME: &str = "Asha";

pub(super) fn schema() -> Vec<String> {
    FEATURE_SCHEMA.iter().map(|name| name.to_string()).collect()
}

/// Applicant from the reference scenario: male, married, one dependent,
/// graduate, not self-employed, 5000 income, 100 loan, one-year term, urban.
pub(super) fn form() -> ApplicationForm {
    ApplicationForm {
        account_number: ACCOUNT.to_string(),
        full_name: NAME.to_string(),
        gender: "Male".to_string(),
        married: "Yes".to_string(),
        dependents: "One".to_string(),
        education: "Graduate".to_string(),
        self_employed: "No".to_string(),
        applicant_income: Some(5000.0),
        coapplicant_income: Some(0.0),
        loan_amount: Some(100.0),
        loan_duration: DurationSelection::Index(3),
        property_area: "Urban".to_string(),
    }
}

/// Classifier returning a fixed label and recording every batch it receives.
pub(super) struct FixedClassifier {
    label: u8,
    feature_names: Vec<String>,
    batches: Mutex<Vec<Vec<FeatureRow>>>,
}

impl FixedClassifier {
    pub(super) fn new(label: u8) -> Self {
        Self::with_features(label, schema())
    }

    pub(super) fn with_features(label: u8, feature_names: Vec<String>) -> Self {
        Self {
            label,
            feature_names,
            batches: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.batches.lock().expect("classifier mutex poisoned").len()
    }

    pub(super) fn last_batch(&self) -> Option<Vec<FeatureRow>> {
        self.batches
            .lock()
            .expect("classifier mutex poisoned")
            .last()
            .cloned()
    }
}

impl Classifier for FixedClassifier {
    fn kind(&self) -> &'static str {
        "fixed"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, batch: &[FeatureRow]) -> Result<Vec<u8>, PredictionError> {
        self.batches
            .lock()
            .expect("classifier mutex poisoned")
            .push(batch.to_vec());
        Ok(vec![self.label; batch.len()])
    }
}

pub(super) struct FailingClassifier {
    error: PredictionError,
    feature_names: Vec<String>,
}

impl FailingClassifier {
    pub(super) fn new(error: PredictionError) -> Self {
        Self {
            error,
            feature_names: schema(),
        }
    }
}

impl Classifier for FailingClassifier {
    fn kind(&self) -> &'static str {
        "failing"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, _batch: &[FeatureRow]) -> Result<Vec<u8>, PredictionError> {
        Err(self.error.clone())
    }
}

pub(super) struct PanickingClassifier {
    feature_names: Vec<String>,
}

impl PanickingClassifier {
    pub(super) fn new() -> Self {
        Self {
            feature_names: schema(),
        }
    }
}

impl Classifier for PanickingClassifier {
    fn kind(&self) -> &'static str {
        "panicking"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, _batch: &[FeatureRow]) -> Result<Vec<u8>, PredictionError> {
        panic!("matrix dimensions do not align")
    }
}

/// Returns raw labels, including ones outside the binary contract.
pub(super) struct RawLabels(pub(super) Vec<u8>);

impl Classifier for RawLabels {
    fn kind(&self) -> &'static str {
        "raw"
    }

    fn feature_names(&self) -> &[String] {
        &[]
    }

    fn predict(&self, _batch: &[FeatureRow]) -> Result<Vec<u8>, PredictionError> {
        Ok(self.0.clone())
    }
}

/// Loader that counts storage reads and hands out a preset outcome.
#[derive(Clone)]
pub(super) struct CountingLoader {
    outcome: Result<Arc<dyn Classifier>, ModelLoadError>,
    reads: Arc<AtomicUsize>,
}

impl CountingLoader {
    pub(super) fn serving(model: Arc<dyn Classifier>) -> Self {
        Self {
            outcome: Ok(model),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(super) fn missing() -> Self {
        Self {
            outcome: Err(ModelLoadError::NotFound {
                path: "models/absent.json".to_string(),
            }),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(super) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ArtifactLoader for CountingLoader {
    fn describe(&self) -> String {
        "memory://counting".to_string()
    }

    fn load(&self) -> Result<Arc<dyn Classifier>, ModelLoadError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

pub(super) fn build_service(
    label: u8,
) -> (
    EligibilityService<CountingLoader>,
    Arc<FixedClassifier>,
    CountingLoader,
) {
    let classifier = Arc::new(FixedClassifier::new(label));
    let loader = CountingLoader::serving(classifier.clone());
    let service = EligibilityService::new(Arc::new(ModelRepository::new(loader.clone())));
    (service, classifier, loader)
}

pub(super) fn unavailable_service() -> (EligibilityService<CountingLoader>, CountingLoader) {
    let loader = CountingLoader::missing();
    let service = EligibilityService::new(Arc::new(ModelRepository::new(loader.clone())));
    (service, loader)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
