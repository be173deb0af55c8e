//! # Patient Records API
//!
//! Read-only views over the records file.
//!
//! ## Endpoints
//!
//! - `GET /view`: all records keyed by patient id
//! - `GET /patient/{patient_id}`: one record
//! - `GET /sort?sort_by=<height|weight|bmi>&order=<ascending|descending>`:
//!   records sorted by a numeric column


use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::state::AppState;
use crate::store::{PatientRecord, PatientTable, SortField, SortOrder};

// ── Request DTOs ────────────────────────────────────────────────────

/// Query parameters for `GET /sort`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SortParams {
    /// Sort on the basis of height, weight, or bmi.
    pub sort_by: String,
    /// Sort in ascending or descending order (default: ascending).
    pub order: Option<String>,
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/view", get(view))
        .route("/patient/{patient_id}", get(view_patient))
        .route("/sort", get(sort_patients))
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /view: All records, keyed by patient id, in file order.
#[utoipa::path(
    get,
    path = "/view",
    responses(
        (status = 200, description = "All patient records", body = BTreeMap<String, PatientRecord>),
        (status = 500, description = "Records file unreadable", body = crate::error::ErrorBody),
    ),
    tag = "patients"
)]
pub(crate) async fn view(State(state): State<AppState>) -> Result<Json<PatientTable>, AppError> {
    Ok(Json(state.store.load().await?))
}

/// GET /patient/{patient_id}: One record.
#[utoipa::path(
    get,
    path = "/patient/{patient_id}",
    params(("patient_id" = String, Path, description = "ID of the patient in the database", example = "P001")),
    responses(
        (status = 200, description = "Patient found", body = PatientRecord),
        (status = 404, description = "Patient not found", body = crate::error::ErrorBody),
    ),
    tag = "patients"
)]
pub(crate) async fn view_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientRecord>, AppError> {
    let table = state.store.load().await?;
    table
        .get(&patient_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("patient {patient_id}")))
}

/// GET /sort: Records sorted by height, weight, or BMI.
#[utoipa::path(
    get,
    path = "/sort",
    params(SortParams),
    responses(
        (status = 200, description = "Sorted patient records", body = Vec<PatientRecord>),
        (status = 400, description = "Invalid sort field or order", body = crate::error::ErrorBody),
    ),
    tag = "patients"
)]
pub(crate) async fn sort_patients(
    State(state): State<AppState>,
    params: Result<Query<SortParams>, QueryRejection>,
) -> Result<Json<Vec<PatientRecord>>, AppError> {
    let params = extract_query(params)?;
    let field: SortField = params.sort_by.parse().map_err(AppError::BadRequest)?;
    let order: SortOrder = match params.order.as_deref() {
        Some(order) => order.parse().map_err(AppError::BadRequest)?,
        None => SortOrder::default(),
    };

    let table = state.store.load().await?;
    tracing::debug!(?field, ?order, count = table.len(), "sorting patient records");
    Ok(Json(table.into_sorted(field, order)))
}
