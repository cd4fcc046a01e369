use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use loan_eligibility::error::AppError;
use loan_eligibility::workflows::eligibility::{
    eligibility_router, ArtifactLoader, BatchOutcome, BatchScorer, EligibilityService,
};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

pub(crate) fn with_eligibility_routes<L>(service: Arc<EligibilityService<L>>) -> axum::Router
where
    L: ArtifactLoader + 'static,
{
    let batch = axum::Router::new()
        .route("/api/v1/loan/batch", axum::routing::post(batch_endpoint::<L>))
        .with_state(service.clone());

    eligibility_router(service)
        .merge(batch)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Score a CSV export posted as the request body.
pub(crate) async fn batch_endpoint<L>(
    State(service): State<Arc<EligibilityService<L>>>,
    body: String,
) -> Result<Json<Vec<BatchOutcome>>, AppError>
where
    L: ArtifactLoader + 'static,
{
    let reader = Cursor::new(body.into_bytes());
    let outcomes = BatchScorer::new(service.as_ref()).score_reader(reader)?;
    Ok(Json(outcomes))
}
