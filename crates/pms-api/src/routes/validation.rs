//! # Patient Validation API
//!
//! `POST /v1/patients/validate` runs a submitted record through the shared
//! [`PatientValidator`](pms_core::PatientValidator) and returns the
//! normalized patient with its computed BMI.
//!
//! The body is taken as untyped JSON so that wrong types and missing fields
//! are reported per field by the validator rather than rejected wholesale by
//! the extractor.
//!
//! | Outcome                         | Status |
//! |---------------------------------|--------|
//! | Valid record                    | 201    |
//! | Field failures                  | 422    |
//! | Emergency-contact rule failure  | 400    |
//! | Malformed JSON                  | 400    |

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use pms_core::{Address, Patient};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

// ── Schema DTOs ─────────────────────────────────────────────────────

/// Postal address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AddressDto {
    pub city: String,
    pub state: String,
    /// Six ASCII digits.
    pub pin_code: String,
}

impl From<&Address> for AddressDto {
    fn from(address: &Address) -> Self {
        Self {
            city: address.city().to_string(),
            state: address.state().to_string(),
            pin_code: address.pin_code().to_string(),
        }
    }
}

/// Shape of the record accepted by the validate endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PatientPayload {
    /// At most 50 characters. Stored upper-cased.
    pub name: String,
    /// 1..=119.
    pub age: i64,
    /// Must belong to hdfc.com or icici.com.
    pub email: String,
    /// Kilograms, greater than 0.
    pub weight: f64,
    /// Meters, greater than 0.
    pub height: f64,
    #[serde(default)]
    pub married: Option<bool>,
    /// At most 5 entries.
    #[serde(default)]
    pub allergies: Option<Vec<String>>,
    /// Must contain `emergency` when age is over 60.
    pub contact_details: BTreeMap<String, String>,
    pub address: AddressDto,
}

/// A validated patient.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientResponse {
    pub name: String,
    pub age: u32,
    pub email: String,
    pub weight: f64,
    pub height: f64,
    pub married: bool,
    pub allergies: Option<Vec<String>>,
    pub contact_details: BTreeMap<String, String>,
    pub address: AddressDto,
    /// weight / height², rounded to two decimals.
    pub bmi: f64,
}

impl From<&Patient> for PatientResponse {
    fn from(patient: &Patient) -> Self {
        Self {
            name: patient.name().to_string(),
            age: patient.age(),
            email: patient.email().to_string(),
            weight: patient.weight(),
            height: patient.height(),
            married: patient.is_married(),
            allergies: patient.allergies().map(<[String]>::to_vec),
            contact_details: patient.contact_details().clone(),
            address: AddressDto::from(patient.address()),
            bmi: patient.bmi(),
        }
    }
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/patients/validate", post(validate_patient))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /v1/patients/validate: Validate and normalize a patient record.
#[utoipa::path(
    post,
    path = "/v1/patients/validate",
    request_body = PatientPayload,
    responses(
        (status = 201, description = "Record is valid", body = PatientResponse),
        (status = 400, description = "Malformed JSON or record rule failed", body = crate::error::ErrorBody),
        (status = 422, description = "One or more fields rejected", body = crate::error::ErrorBody),
    ),
    tag = "validation"
)]
pub(crate) async fn validate_patient(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<PatientResponse>), AppError> {
    let value = extract_json(body)?;
    let patient = state.validator.validate_value(value)?;
    Ok((StatusCode::CREATED, Json(PatientResponse::from(&patient))))
}
