//! # Integration Tests for pms-api
//!
//! Drives the assembled router with `oneshot` requests: info messages,
//! record browsing and sorting against a temporary records file, patient
//! validation outcomes, health probes, and OpenAPI generation.

use std::io::Write;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tower::ServiceExt;

use pms_api::state::{AppConfig, AppState};

const RECORDS: &str = r#"{
    "P001": {"name": "Ananya Verma", "city": "Guwahati", "age": 28, "gender": "female", "height": 1.65, "weight": 90.0, "bmi": 33.06, "verdict": "Obese"},
    "P002": {"name": "Ravi Mehta", "city": "Mumbai", "age": 35, "gender": "male", "height": 1.75, "weight": 85, "bmi": 27.76, "verdict": "Overweight"},
    "P003": {"name": "Sneha Kulkarni", "city": "Pune", "age": 22, "gender": "female", "height": 1.6, "weight": 45, "bmi": 17.58, "verdict": "Underweight"}
}"#;

/// Helper: write the sample records to a temp file.
fn records_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(RECORDS.as_bytes()).unwrap();
    file
}

/// Helper: build the test app reading from `file`.
fn test_app(file: &NamedTempFile) -> axum::Router {
    let config = AppConfig {
        patients_file: file.path().to_path_buf(),
        ..AppConfig::default()
    };
    pms_api::app(AppState::with_config(config))
}

async fn get(app: axum::Router, uri: &str) -> axum::http::Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: axum::Router, uri: &str, body: String) -> axum::http::Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn valid_patient() -> Value {
    json!({
        "name": "John Doe",
        "age": 30,
        "email": "john@hdfc.com",
        "weight": 70.0,
        "height": 1.75,
        "contact_details": {"phone": "123"},
        "address": {"city": "Mumbai", "state": "Maharashtra", "pin_code": "400001"}
    })
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let file = records_file();
    let response = get(test_app(&file), "/health/liveness").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let file = records_file();
    let response = get(test_app(&file), "/health/readiness").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Info ---------------------------------------------------------------------

#[tokio::test]
async fn test_home_and_about_messages() {
    let file = records_file();
    let home = body_json(get(test_app(&file), "/").await).await;
    assert_eq!(home, json!({"message": "Patient Management System API"}));

    let about = body_json(get(test_app(&file), "/about").await).await;
    assert_eq!(
        about,
        json!({"message": "A fully functional API to manage your patients' records"})
    );
}

// -- Records ------------------------------------------------------------------

#[tokio::test]
async fn test_view_returns_all_records_in_file_order() {
    let file = records_file();
    let response = get(test_app(&file), "/view").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let ids: Vec<&String> = body.as_object().unwrap().keys().collect();
    assert_eq!(ids, ["P001", "P002", "P003"]);
    assert_eq!(body["P001"]["city"], "Guwahati");
}

#[tokio::test]
async fn test_view_patient_found() {
    let file = records_file();
    let response = get(test_app(&file), "/patient/P002").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Ravi Mehta");
    assert_eq!(body["verdict"], "Overweight");
}

#[tokio::test]
async fn test_view_patient_not_found() {
    let file = records_file();
    let response = get(test_app(&file), "/patient/P999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_missing_records_file_is_internal_error() {
    let config = AppConfig {
        patients_file: "/nonexistent/patients.json".into(),
        ..AppConfig::default()
    };
    let app = pms_api::app(AppState::with_config(config));
    let response = get(app, "/view").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "An internal error occurred");
}

// -- Sort ---------------------------------------------------------------------

fn names(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_sort_defaults_to_ascending() {
    let file = records_file();
    let response = get(test_app(&file), "/sort?sort_by=bmi").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(names(&body), ["Sneha Kulkarni", "Ravi Mehta", "Ananya Verma"]);
}

#[tokio::test]
async fn test_sort_descending_by_height() {
    let file = records_file();
    let response = get(test_app(&file), "/sort?sort_by=height&order=descending").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(names(&body), ["Ravi Mehta", "Ananya Verma", "Sneha Kulkarni"]);
}

#[tokio::test]
async fn test_sort_rejects_unknown_field() {
    let file = records_file();
    let response = get(test_app(&file), "/sort?sort_by=age").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Invalid field"));
}

#[tokio::test]
async fn test_sort_rejects_unknown_order() {
    let file = records_file();
    let response = get(test_app(&file), "/sort?sort_by=weight&order=sideways").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Invalid order"));
}

#[tokio::test]
async fn test_sort_requires_sort_by() {
    let file = records_file();
    let response = get(test_app(&file), "/sort").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// -- Validation ---------------------------------------------------------------

#[tokio::test]
async fn test_validate_accepts_valid_patient() {
    let file = records_file();
    let response = post_json(
        test_app(&file),
        "/v1/patients/validate",
        valid_patient().to_string(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["name"], "JOHN DOE");
    assert_eq!(body["bmi"], 22.86);
    assert_eq!(body["married"], false);
    assert_eq!(body["allergies"], Value::Null);
    assert_eq!(body["address"]["pin_code"], "400001");
}

#[tokio::test]
async fn test_validate_coerces_scalar_strings() {
    let file = records_file();
    let mut patient = valid_patient();
    patient["age"] = json!("30");
    patient["weight"] = json!("70");
    patient["married"] = json!("yes");
    patient["email"] = json!("John@HDFC.COM");

    let response = post_json(test_app(&file), "/v1/patients/validate", patient.to_string()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["age"], 30);
    assert_eq!(body["weight"], 70.0);
    assert_eq!(body["married"], true);
    assert_eq!(body["email"], "John@hdfc.com");
    assert_eq!(body["bmi"], 22.86);
}

#[tokio::test]
async fn test_validate_reports_every_field_failure() {
    let file = records_file();
    let mut patient = valid_patient();
    patient["age"] = json!(0);
    patient["email"] = json!("john@gmail.com");
    patient["address"]["pin_code"] = json!("12ab56");

    let response = post_json(test_app(&file), "/v1/patients/validate", patient.to_string()).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["age", "email", "address.pin_code"]);
}

#[tokio::test]
async fn test_validate_reports_missing_field() {
    let file = records_file();
    let mut patient = valid_patient();
    patient.as_object_mut().unwrap().remove("height");

    let response = post_json(test_app(&file), "/v1/patients/validate", patient.to_string()).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["details"][0]["field"], "height");
    assert_eq!(body["error"]["details"][0]["message"], "field required");
}

#[tokio::test]
async fn test_validate_elderly_without_emergency_contact() {
    let file = records_file();
    let mut patient = valid_patient();
    patient["age"] = json!(65);

    let response = post_json(test_app(&file), "/v1/patients/validate", patient.to_string()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("emergency contact"));
}

#[tokio::test]
async fn test_validate_elderly_with_emergency_contact() {
    let file = records_file();
    let mut patient = valid_patient();
    patient["age"] = json!(65);
    patient["contact_details"]["emergency"] = json!("999");

    let response = post_json(test_app(&file), "/v1/patients/validate", patient.to_string()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_validate_malformed_json() {
    let file = records_file();
    let response = post_json(
        test_app(&file),
        "/v1/patients/validate",
        "{not json".to_string(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_validate_non_object_body() {
    let file = records_file();
    let response = post_json(test_app(&file), "/v1/patients/validate", "[1, 2]".to_string()).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_spec_is_served() {
    let file = records_file();
    let response = get(test_app(&file), "/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["info"]["title"], "Patient Management System API");
    assert!(body["paths"]["/v1/patients/validate"]["post"].is_object());
}
