use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::ApplicationForm;
use super::duration::{DURATION_LABELS, TERM_VALUES};
use super::encoding::OptionSet;
use super::inference::InferenceError;
use super::model::ArtifactLoader;
use super::presenter::{present_failure, present_malformed};
use super::service::{EligibilityError, EligibilityService};

/// Router builder exposing the eligibility pipeline to the form collaborator.
pub fn eligibility_router<L>(service: Arc<EligibilityService<L>>) -> Router
where
    L: ArtifactLoader + 'static,
{
    Router::new()
        .route("/api/v1/loan/eligibility", post(assess_handler::<L>))
        .route("/api/v1/loan/options", get(options_handler))
        .route("/api/v1/loan/model", get(model_status_handler::<L>))
        .with_state(service)
}

pub(crate) async fn assess_handler<L>(
    State(service): State<Arc<EligibilityService<L>>>,
    payload: Result<axum::Json<ApplicationForm>, JsonRejection>,
) -> Response
where
    L: ArtifactLoader + 'static,
{
    let form = match payload {
        Ok(axum::Json(form)) => form,
        Err(rejection) => return rejection_response(rejection),
    };

    match service.assess(&form) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(error) => {
            let status = match &error {
                EligibilityError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                EligibilityError::Inference(InferenceError::Unavailable(_)) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                EligibilityError::Inference(_) | EligibilityError::Schema(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            let mut payload = json!({
                "error": error.to_string(),
                "message": present_failure(&error),
            });
            if let EligibilityError::Validation(validation) = &error {
                payload["issues"] = json!(validation.issues);
            }
            (status, axum::Json(payload)).into_response()
        }
    }
}

// Bodies that never reach the builder, e.g. a non-numeric income or broken JSON.
fn rejection_response(rejection: JsonRejection) -> Response {
    let detail = rejection.body_text();
    let status = match rejection {
        JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    let payload = json!({
        "error": detail,
        "message": present_malformed(&detail),
    });
    (status, axum::Json(payload)).into_response()
}

#[derive(Debug, Serialize)]
pub struct OptionSetView {
    pub field: &'static str,
    pub labels: Vec<OptionView>,
}

#[derive(Debug, Serialize)]
pub struct OptionView {
    pub label: &'static str,
    pub code: u32,
}

#[derive(Debug, Serialize)]
pub struct OptionCatalog {
    pub categories: Vec<OptionSetView>,
    pub loan_duration: Vec<OptionView>,
}

/// Labels and codes the form should offer.
pub fn option_catalog() -> OptionCatalog {
    let categories = OptionSet::ALL
        .iter()
        .map(|set| OptionSetView {
            field: set.field(),
            labels: set
                .labels()
                .iter()
                .enumerate()
                .map(|(code, label)| OptionView {
                    label,
                    code: code as u32,
                })
                .collect(),
        })
        .collect();

    let loan_duration = DURATION_LABELS
        .iter()
        .zip(TERM_VALUES)
        .map(|(label, term)| OptionView { label, code: term })
        .collect();

    OptionCatalog {
        categories,
        loan_duration,
    }
}

pub(crate) async fn options_handler() -> axum::Json<OptionCatalog> {
    axum::Json(option_catalog())
}

pub(crate) async fn model_status_handler<L>(
    State(service): State<Arc<EligibilityService<L>>>,
) -> Response
where
    L: ArtifactLoader + 'static,
{
    let view = service.model_status();
    let status = if view.status == "ready" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, axum::Json(view)).into_response()
}
