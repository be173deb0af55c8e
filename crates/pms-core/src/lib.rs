#![deny(missing_docs)]

//! # pms-core: Patient Record Validation
//!
//! Foundational types for the Patient Management System. No internal crate
//! dependencies: only `serde`, `serde_json`, `thiserror`, `tracing`, `regex`
//! and `once_cell` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **A [`Patient`] exists only fully validated.** Fields are private and
//!    every constructor runs the [`PatientValidator`] pipeline, including
//!    `Deserialize`.
//!
//! 2. **Registries, not reflection.** Field rules and record rules are plain
//!    function tables ([`validate::FIELD_RULES`], [`validate::RECORD_RULES`])
//!    applied uniformly.
//!
//! 3. **Derived values are never stored.** [`Patient::bmi`] is computed from
//!    weight and height on demand.
//!
//! 4. **Diagnostics are a hook.** Validation stages are reported to a
//!    [`ValidationObserver`]; the default traces them, [`NoopObserver`]
//!    keeps validation silent.

pub mod address;
pub mod email;
pub mod error;
pub mod patient;
pub mod validate;

// Re-export primary types at crate root for ergonomic imports.
pub use address::{Address, AddressInput};
pub use email::ALLOWED_EMAIL_DOMAINS;
pub use error::{FieldError, FieldErrorKind, PmsError, RecordError, ValidationError};
pub use patient::{compute_bmi, Patient, PatientInput, EMERGENCY_CONTACT_KEY};
pub use validate::{
    NoopObserver, PatientValidator, RawRecord, TracingObserver, ValidationMode,
    ValidationObserver, ValidationStage,
};
