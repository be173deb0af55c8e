//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI 3.1 spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Patient Management System API",
        version = "0.1.0",
        description = "Browse stored patient records and validate new ones.",
        license(name = "MIT")
    ),
    paths(
        // Info
        crate::routes::info::home,
        crate::routes::info::about,
        // Patients
        crate::routes::patients::view,
        crate::routes::patients::view_patient,
        crate::routes::patients::sort_patients,
        // Validation
        crate::routes::validation::validate_patient,
    ),
    components(schemas(
        crate::store::PatientRecord,
        crate::routes::info::MessageResponse,
        crate::routes::validation::AddressDto,
        crate::routes::validation::PatientPayload,
        crate::routes::validation::PatientResponse,
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::error::FieldIssue,
    )),
    tags(
        (name = "info", description = "Service information"),
        (name = "patients", description = "Stored patient records"),
        (name = "validation", description = "Patient record validation"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
