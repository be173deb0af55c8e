//! # Patient Record
//!
//! The validated, immutable patient. Fields are private; every constructor
//! goes through [`PatientValidator`], so holding a [`Patient`] proves that
//! every field rule and record rule passed.
//!
//! BMI is not stored. [`Patient::bmi`] derives it from weight and height on
//! each call and it is emitted alongside the stored fields on serialization.

use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::address::{Address, AddressInput};
use crate::error::ValidationError;
use crate::validate::{PatientValidator, RawRecord};

/// Contact key that patients over 60 must provide.
pub const EMERGENCY_CONTACT_KEY: &str = "emergency";

/// A fully validated patient.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Patient {
    pub(crate) name: String,
    pub(crate) age: u32,
    pub(crate) email: String,
    pub(crate) weight: f64,
    pub(crate) height: f64,
    pub(crate) married: bool,
    pub(crate) allergies: Option<Vec<String>>,
    pub(crate) contact_details: BTreeMap<String, String>,
    pub(crate) address: Address,
}

impl Patient {
    /// Validate typed input into a patient.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Fields`] on the first field failure and
    /// [`ValidationError::Record`] when a cross-field rule fails.
    pub fn new(input: PatientInput) -> Result<Self, ValidationError> {
        PatientValidator::new().validate(&input.into_raw())
    }

    /// Name, uppercased.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Age in years.
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Email address, domain lowercased.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Weight in kilograms.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Height in meters.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Marital status.
    pub fn is_married(&self) -> bool {
        self.married
    }

    /// Allergies, if any were listed.
    pub fn allergies(&self) -> Option<&[String]> {
        self.allergies.as_deref()
    }

    /// Contact details keyed by contact name.
    pub fn contact_details(&self) -> &BTreeMap<String, String> {
        &self.contact_details
    }

    /// Whether an `"emergency"` contact is listed.
    pub fn has_emergency_contact(&self) -> bool {
        self.contact_details.contains_key(EMERGENCY_CONTACT_KEY)
    }

    /// Postal address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Body-mass index, `weight / height²` rounded to 2 decimal places.
    pub fn bmi(&self) -> f64 {
        compute_bmi(self.weight, self.height)
    }
}

/// Unrounded `weight / height²`.
pub fn bmi_ratio(weight: f64, height: f64) -> f64 {
    weight / (height * height)
}

/// BMI rounded to 2 decimal places.
pub fn compute_bmi(weight: f64, height: f64) -> f64 {
    round2(bmi_ratio(weight, height))
}

fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    // past 2^52 every f64 is already an integer, so there is nothing to round
    if !scaled.is_finite() || value.abs() >= 4_503_599_627_370_496.0 {
        return value;
    }
    scaled.round() / 100.0
}

impl Serialize for Patient {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Patient", 10)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("age", &self.age)?;
        s.serialize_field("email", &self.email)?;
        s.serialize_field("weight", &self.weight)?;
        s.serialize_field("height", &self.height)?;
        s.serialize_field("married", &self.married)?;
        s.serialize_field("allergies", &self.allergies)?;
        s.serialize_field("contact_details", &self.contact_details)?;
        s.serialize_field("address", &self.address)?;
        s.serialize_field("bmi", &self.bmi())?;
        s.end()
    }
}

impl TryFrom<Value> for Patient {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        PatientValidator::new().validate_value(value)
    }
}

/// Typed, unvalidated patient input.
///
/// Convenience for building patients from Rust code; it is lowered to a raw
/// field mapping and goes through the same validation as untrusted JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: i64,
    /// Email address.
    pub email: String,
    /// Weight in kilograms.
    pub weight: f64,
    /// Height in meters.
    pub height: f64,
    /// Marital status.
    #[serde(default)]
    pub married: bool,
    /// Optional allergy list.
    #[serde(default)]
    pub allergies: Option<Vec<String>>,
    /// Contact name → contact value.
    #[serde(default)]
    pub contact_details: BTreeMap<String, String>,
    /// Postal address.
    pub address: AddressInput,
}

impl PatientInput {
    /// Lower to the raw mapping consumed by [`PatientValidator`].
    pub fn into_raw(self) -> RawRecord {
        let mut raw = Map::new();
        raw.insert("name".into(), Value::from(self.name));
        raw.insert("age".into(), Value::from(self.age));
        raw.insert("email".into(), Value::from(self.email));
        raw.insert("weight".into(), Value::from(self.weight));
        raw.insert("height".into(), Value::from(self.height));
        raw.insert("married".into(), Value::from(self.married));
        raw.insert(
            "allergies".into(),
            self.allergies.map_or(Value::Null, Value::from),
        );
        raw.insert(
            "contact_details".into(),
            Value::Object(
                self.contact_details
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            ),
        );
        let mut address = Map::new();
        address.insert("city".into(), Value::from(self.address.city));
        address.insert("state".into(), Value::from(self.address.state));
        address.insert("pin_code".into(), Value::from(self.address.pin_code));
        raw.insert("address".into(), Value::Object(address));
        raw
    }
}
