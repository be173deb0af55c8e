//! # Record Rules
//!
//! Cross-field rules evaluated on the assembled [`Patient`]. They see the
//! validated, transformed values, never the raw input.

use crate::error::RecordError;
use crate::patient::Patient;

/// Age above which an emergency contact is mandatory.
pub const EMERGENCY_CONTACT_AGE: u32 = 60;

/// Signature shared by every record rule.
pub type RecordRuleFn = fn(&Patient) -> Result<(), RecordError>;

/// A named entry in the record registry.
#[derive(Clone, Copy)]
pub struct RecordRule {
    /// Rule name, reported to observers.
    pub name: &'static str,
    /// The check.
    pub check: RecordRuleFn,
}

impl std::fmt::Debug for RecordRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordRule").field("name", &self.name).finish()
    }
}

/// Record rules, applied in order after assembly.
pub const RECORD_RULES: &[RecordRule] = &[RecordRule {
    name: "emergency_contact",
    check: emergency_contact,
}];

/// Patients over 60 must list an `"emergency"` contact.
pub fn emergency_contact(patient: &Patient) -> Result<(), RecordError> {
    if patient.age() > EMERGENCY_CONTACT_AGE && !patient.has_emergency_contact() {
        return Err(RecordError::MissingEmergencyContact { age: patient.age() });
    }
    Ok(())
}
