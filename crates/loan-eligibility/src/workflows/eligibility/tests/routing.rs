use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::eligibility::router::{assess_handler, eligibility_router};

#[tokio::test]
async fn assess_handler_returns_positive_assessment() {
    let (service, _, _) = build_service(1);

    let response =
        assess_handler::<CountingLoader>(State(Arc::new(service)), Ok(axum::Json(form()))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["decision"], json!("eligible"));
    assert_eq!(payload["message"]["tone"], json!("positive"));
    assert_eq!(payload["profile"]["loan_term"], json!(360));
    assert!(payload.get("assessed_at").is_some());
}

#[tokio::test]
async fn assess_handler_returns_unprocessable_for_missing_identity() {
    let (service, classifier, _) = build_service(1);
    let mut form = form();
    form.account_number = String::new();

    let response =
        assess_handler::<CountingLoader>(State(Arc::new(service)), Ok(axum::Json(form))).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"]["tone"], json!("error"));
    assert_eq!(payload["issues"][0]["field"], json!("account_number"));
    assert_eq!(payload["issues"][0]["kind"], json!("missing"));
    assert_eq!(classifier.calls(), 0);
}

#[tokio::test]
async fn assess_handler_returns_service_unavailable_without_model() {
    let (service, _) = unavailable_service();

    let response =
        assess_handler::<CountingLoader>(State(Arc::new(service)), Ok(axum::Json(form()))).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert!(payload["message"]["text"]
        .as_str()
        .unwrap_or_default()
        .contains("prediction model is not loaded"));
}

#[tokio::test]
async fn eligibility_route_accepts_label_durations() {
    let (service, _, _) = build_service(0);
    let router = eligibility_router(Arc::new(service));
    let mut body = serde_json::to_value(form()).expect("form serializes");
    body["loan_duration"] = json!("16 Month");

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/loan/eligibility")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&body).expect("encode body"),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["decision"], json!("not_eligible"));
    assert_eq!(payload["profile"]["loan_term"], json!(480));
}

async fn post_form(router: axum::Router, body: serde_json::Value) -> axum::response::Response {
    router
        .oneshot(
            axum::http::Request::post("/api/v1/loan/eligibility")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&body).expect("encode body"),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes")
}

#[tokio::test]
async fn unusable_durations_fall_back_to_the_first_term() {
    for duration in [json!(-1), json!(2.5), json!(null)] {
        let (service, classifier, _) = build_service(1);
        let router = eligibility_router(Arc::new(service));
        let mut body = serde_json::to_value(form()).expect("form serializes");
        body["loan_duration"] = duration.clone();

        let response = post_form(router, body).await;

        assert_eq!(response.status(), StatusCode::OK, "duration {duration}");
        let payload = read_json_body(response).await;
        assert_eq!(payload["profile"]["loan_term"], json!(60));
        assert_eq!(classifier.calls(), 1);
    }
}

#[tokio::test]
async fn absent_category_is_reported_as_a_missing_field() {
    let (service, classifier, _) = build_service(1);
    let router = eligibility_router(Arc::new(service));
    let mut body = serde_json::to_value(form()).expect("form serializes");
    body.as_object_mut()
        .expect("form is an object")
        .remove("gender");

    let response = post_form(router, body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["issues"][0]["field"], json!("gender"));
    assert_eq!(payload["issues"][0]["kind"], json!("missing"));
    assert_eq!(payload["message"]["tone"], json!("error"));
    assert_eq!(classifier.calls(), 0);
}

#[tokio::test]
async fn unreadable_body_gets_a_structured_error() {
    let (service, classifier, _) = build_service(1);
    let router = eligibility_router(Arc::new(service));
    let mut body = serde_json::to_value(form()).expect("form serializes");
    body["applicant_income"] = json!("lots");

    let response = post_form(router, body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"]["tone"], json!("error"));
    assert!(payload["message"]["text"]
        .as_str()
        .unwrap_or_default()
        .starts_with("Please correct the form"));
    assert!(payload["error"].as_str().is_some());
    assert_eq!(classifier.calls(), 0);
}

#[tokio::test]
async fn options_route_lists_codes_in_training_order() {
    let (service, _, _) = build_service(1);
    let router = eligibility_router(Arc::new(service));

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/loan/options")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let dependents = payload["categories"]
        .as_array()
        .expect("categories array")
        .iter()
        .find(|set| set["field"] == json!("dependents"))
        .expect("dependents listed")
        .clone();
    assert_eq!(dependents["labels"][3]["label"], json!("More than Two"));
    assert_eq!(dependents["labels"][3]["code"], json!(3));
    assert_eq!(payload["loan_duration"][3]["label"], json!("1 Year"));
    assert_eq!(payload["loan_duration"][3]["code"], json!(360));
}

#[tokio::test]
async fn model_route_reports_unavailable_artifact() {
    let (service, _) = unavailable_service();
    let router = eligibility_router(Arc::new(service));

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/loan/model")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], json!("unavailable"));
    assert!(payload.get("feature_names").is_none());
}
