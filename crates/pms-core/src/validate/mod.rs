//! # Patient Validation Pipeline
//!
//! Turns an untrusted field mapping into a [`Patient`]:
//!
//! ```text
//! raw mapping ─▶ field rules ─▶ assemble ─▶ record rules ─▶ BMI ─▶ Patient
//! ```
//!
//! ## Registries
//!
//! Field rules live in [`fields::FIELD_RULES`] (field name → rule, applied
//! uniformly in declaration order). Record rules live in
//! [`record::RECORD_RULES`] and run only once every field validated.
//!
//! ## Failure policy
//!
//! [`ValidationMode::FailFast`] (the default) stops at the first rejected
//! field. [`ValidationMode::CollectAll`] runs every field rule and reports all
//! rejected fields together. In both modes a record rule failure discards the
//! assembled record; it never escapes the validator.
//!
//! Unknown keys in the raw mapping are ignored. In particular a supplied
//! `bmi` never overrides the derived value.

pub mod fields;
pub mod observer;
pub mod record;

use std::collections::BTreeMap;
use std::io::Read;

use serde_json::{Map, Value};

use crate::address::Address;
use crate::error::{FieldError, FieldErrorKind, PmsError, RecordError, ValidationError};
use crate::patient::{bmi_ratio, Patient};

pub use fields::{transform_name, FieldRule, FieldValue, FIELD_RULES};
pub use observer::{NoopObserver, TracingObserver, ValidationObserver, ValidationStage};
pub use record::{RecordRule, RECORD_RULES};

/// Untrusted field-name → raw-value mapping.
pub type RawRecord = Map<String, Value>;

/// How field failures are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Abort at the first rejected field.
    #[default]
    FailFast,
    /// Check every field and report all rejections.
    CollectAll,
}

/// The record validator.
///
/// Stateless apart from its observer and mode; one instance can be shared
/// across threads and reused for any number of records.
#[derive(Debug, Clone, Default)]
pub struct PatientValidator<O = TracingObserver> {
    observer: O,
    mode: ValidationMode,
}

impl PatientValidator<TracingObserver> {
    /// Fail-fast validator that traces each stage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O: ValidationObserver> PatientValidator<O> {
    /// Validator reporting stages to `observer`.
    pub fn with_observer(observer: O) -> Self {
        Self {
            observer,
            mode: ValidationMode::default(),
        }
    }

    /// Set the failure-reporting mode.
    pub fn mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// The configured failure-reporting mode.
    pub fn current_mode(&self) -> ValidationMode {
        self.mode
    }

    /// Validate a single declared field.
    ///
    /// `raw` is `None` when the field is absent from the input.
    ///
    /// # Errors
    ///
    /// Returns the field's [`FieldError`], or a constraint error if
    /// `field_name` is not a declared patient field.
    pub fn validate_field(
        &self,
        field_name: &str,
        raw: Option<&Value>,
    ) -> Result<FieldValue, FieldError> {
        let rule = FIELD_RULES
            .iter()
            .find(|rule| rule.field == field_name)
            .ok_or_else(|| FieldError::constraint(field_name, "not a patient field"))?;
        (rule.apply)(raw, &self.observer)
    }

    /// Run every record rule against an assembled patient.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule's [`RecordError`]; the patient is
    /// dropped.
    pub fn validate_cross_field(&self, patient: Patient) -> Result<Patient, RecordError> {
        for rule in RECORD_RULES {
            let outcome = (rule.check)(&patient);
            self.observer.on_stage(&ValidationStage::CrossFieldChecked {
                rule: rule.name,
                age: patient.age(),
                passed: outcome.is_ok(),
            });
            outcome?;
        }
        Ok(patient)
    }

    /// Validate a raw field mapping into a patient.
    ///
    /// # Errors
    ///
    /// [`ValidationError::Fields`] when any field rule fails (one entry in
    /// fail-fast mode, all of them in collect-all mode);
    /// [`ValidationError::Record`] when a record rule fails.
    pub fn validate(&self, raw: &RawRecord) -> Result<Patient, ValidationError> {
        let mut draft = PatientDraft::default();
        let mut errors = Vec::new();

        for rule in FIELD_RULES {
            match (rule.apply)(raw.get(rule.field), &self.observer) {
                Ok(value) => draft.set(value),
                Err(err) => {
                    tracing::debug!(field = %err.field, error = %err.kind, "field rejected");
                    if self.mode == ValidationMode::FailFast {
                        return Err(err.into());
                    }
                    errors.push(err);
                }
            }
        }
        if !errors.is_empty() {
            return Err(ValidationError::Fields(errors));
        }

        let patient = self.validate_cross_field(draft.assemble()?)?;

        let bmi = patient.bmi();
        self.observer.on_stage(&ValidationStage::BmiComputed {
            raw: bmi_ratio(patient.weight(), patient.height()),
            rounded: bmi,
        });
        self.observer.on_stage(&ValidationStage::PatientCreated {
            name: patient.name(),
            age: patient.age(),
            bmi,
        });
        Ok(patient)
    }

    /// Validate an arbitrary JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// As [`validate`](Self::validate), plus a type error on the
    /// `patient` pseudo-field when `value` is not an object.
    pub fn validate_value(&self, value: Value) -> Result<Patient, ValidationError> {
        match value {
            Value::Object(raw) => self.validate(&raw),
            _ => Err(FieldError::new(
                "patient",
                FieldErrorKind::WrongType { expected: "object" },
            )
            .into()),
        }
    }

    /// Parse a JSON document from `reader` and validate it.
    ///
    /// # Errors
    ///
    /// [`PmsError::Json`] for malformed JSON, [`PmsError::Io`] for read
    /// failures, [`PmsError::Validation`] when the document is rejected.
    pub fn validate_reader<R: Read>(&self, reader: R) -> Result<Patient, PmsError> {
        let value: Value = serde_json::from_reader(reader).map_err(|err| {
            if err.is_io() {
                PmsError::Io(err.into())
            } else {
                PmsError::Json(err)
            }
        })?;
        Ok(self.validate_value(value)?)
    }
}

/// Field values collected before assembly.
#[derive(Debug, Default)]
struct PatientDraft {
    name: Option<String>,
    age: Option<u32>,
    email: Option<String>,
    weight: Option<f64>,
    height: Option<f64>,
    married: bool,
    allergies: Option<Vec<String>>,
    contact_details: Option<BTreeMap<String, String>>,
    address: Option<Address>,
}

impl PatientDraft {
    fn set(&mut self, value: FieldValue) {
        match value {
            FieldValue::Name(v) => self.name = Some(v),
            FieldValue::Age(v) => self.age = Some(v),
            FieldValue::Email(v) => self.email = Some(v),
            FieldValue::Weight(v) => self.weight = Some(v),
            FieldValue::Height(v) => self.height = Some(v),
            FieldValue::Married(v) => self.married = v,
            FieldValue::Allergies(v) => self.allergies = v,
            FieldValue::ContactDetails(v) => self.contact_details = Some(v),
            FieldValue::Address(v) => self.address = Some(v),
        }
    }

    /// Build the immutable record. Every required field is present once all
    /// field rules passed.
    fn assemble(self) -> Result<Patient, FieldError> {
        fn present<T>(field: &str, value: Option<T>) -> Result<T, FieldError> {
            value.ok_or_else(|| FieldError::new(field, FieldErrorKind::Missing))
        }
        Ok(Patient {
            name: present("name", self.name)?,
            age: present("age", self.age)?,
            email: present("email", self.email)?,
            weight: present("weight", self.weight)?,
            height: present("height", self.height)?,
            married: self.married,
            allergies: self.allergies,
            contact_details: present("contact_details", self.contact_details)?,
            address: present("address", self.address)?,
        })
    }
}
