//! # Field Rules
//!
//! One rule per declared patient field. Each rule coerces the raw JSON value
//! to its Rust type, applies the field's range/length constraints and any
//! transform, and yields a typed [`FieldValue`].

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::address::Address;
use crate::email;
use crate::error::{FieldError, FieldErrorKind};
use crate::validate::observer::{ValidationObserver, ValidationStage};

/// Maximum stored length of a patient name, in characters.
pub const NAME_MAX_CHARS: usize = 50;
/// Exclusive upper bound on patient age.
pub const AGE_UPPER_EXCLUSIVE: i64 = 120;
/// Maximum number of listed allergies.
pub const ALLERGIES_MAX_ITEMS: usize = 5;
/// Number of digits in a PIN code.
pub const PIN_CODE_DIGITS: usize = 6;

/// A validated, typed field value. One variant per declared field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Uppercased name.
    Name(String),
    /// Age in years, within (0, 120).
    Age(u32),
    /// Email with a whitelisted domain.
    Email(String),
    /// Weight in kilograms, positive.
    Weight(f64),
    /// Height in meters, positive.
    Height(f64),
    /// Marital status.
    Married(bool),
    /// Optional allergy list, at most five entries.
    Allergies(Option<Vec<String>>),
    /// Contact name → contact value.
    ContactDetails(BTreeMap<String, String>),
    /// Embedded address.
    Address(Address),
}

/// Signature shared by every field rule: the raw value (absent when the key
/// is missing) and the observer for diagnostic stages.
pub type FieldRuleFn = fn(Option<&Value>, &dyn ValidationObserver) -> Result<FieldValue, FieldError>;

/// A named entry in the field registry.
#[derive(Clone, Copy)]
pub struct FieldRule {
    /// Field name as it appears in the raw input.
    pub field: &'static str,
    /// Validation function for the field.
    pub apply: FieldRuleFn,
}

impl std::fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule").field("field", &self.field).finish()
    }
}

/// The patient field registry, in declaration order.
pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule { field: "name", apply: name },
    FieldRule { field: "age", apply: age },
    FieldRule { field: "email", apply: email_field },
    FieldRule { field: "weight", apply: weight },
    FieldRule { field: "height", apply: height },
    FieldRule { field: "married", apply: married },
    FieldRule { field: "allergies", apply: allergies },
    FieldRule { field: "contact_details", apply: contact_details },
    FieldRule { field: "address", apply: address },
];

// -- Raw coercion -------------------------------------------------------------

fn required<'v>(field: &str, raw: Option<&'v Value>) -> Result<&'v Value, FieldError> {
    raw.ok_or_else(|| FieldError::new(field, FieldErrorKind::Missing))
}

fn expect_str<'v>(field: &str, value: &'v Value) -> Result<&'v str, FieldError> {
    value
        .as_str()
        .ok_or_else(|| FieldError::new(field, FieldErrorKind::WrongType { expected: "string" }))
}

/// Integers, floats with no fractional part (`65.0`) and integer strings
/// (`"65"`).
fn expect_int(field: &str, value: &Value) -> Result<i64, FieldError> {
    let wrong = || FieldError::new(field, FieldErrorKind::WrongType { expected: "integer" });
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    if value.is_u64() {
        // larger than i64::MAX, out of any sane range
        return Ok(i64::MAX);
    }
    if let Some(text) = value.as_str() {
        return text.trim().parse::<i64>().map_err(|_| wrong());
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Ok(f as i64)
        }
        _ => Err(wrong()),
    }
}

/// Numbers and numeric strings (`"70.5"`). Non-finite strings are rejected.
fn expect_number(field: &str, value: &Value) -> Result<f64, FieldError> {
    let wrong = || FieldError::new(field, FieldErrorKind::WrongType { expected: "number" });
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(wrong),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(wrong),
        _ => Err(wrong()),
    }
}

/// Booleans, `0`/`1`, and the usual truthy/falsy words, case-insensitive.
fn expect_bool(field: &str, value: &Value) -> Result<bool, FieldError> {
    let wrong = || FieldError::new(field, FieldErrorKind::WrongType { expected: "boolean" });
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(wrong()),
        },
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "1" | "on" | "t" | "true" | "y" | "yes" => Ok(true),
            "0" | "off" | "f" | "false" | "n" | "no" => Ok(false),
            _ => Err(wrong()),
        },
        _ => Err(wrong()),
    }
}

fn expect_positive(field: &str, value: f64) -> Result<f64, FieldError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(FieldError::constraint(field, "must be greater than 0"))
    }
}

fn expect_non_empty(field: &str, value: &str) -> Result<String, FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::constraint(field, "must not be empty"));
    }
    Ok(value.to_string())
}

// -- Transforms ---------------------------------------------------------------

/// Stored form of a patient name.
pub fn transform_name(value: &str) -> String {
    value.to_uppercase()
}

// -- Rules --------------------------------------------------------------------

fn name(raw: Option<&Value>, observer: &dyn ValidationObserver) -> Result<FieldValue, FieldError> {
    let value = expect_str("name", required("name", raw)?)?;
    let chars = value.chars().count();
    if chars > NAME_MAX_CHARS {
        return Err(FieldError::constraint(
            "name",
            format!("must have at most {NAME_MAX_CHARS} characters, got {chars}"),
        ));
    }
    let stored = transform_name(value);
    observer.on_stage(&ValidationStage::NameTransformed {
        from: value,
        to: &stored,
    });
    Ok(FieldValue::Name(stored))
}

fn age(raw: Option<&Value>, _observer: &dyn ValidationObserver) -> Result<FieldValue, FieldError> {
    let value = expect_int("age", required("age", raw)?)?;
    if value <= 0 {
        return Err(FieldError::constraint("age", "must be greater than 0"));
    }
    if value >= AGE_UPPER_EXCLUSIVE {
        return Err(FieldError::constraint(
            "age",
            format!("must be less than {AGE_UPPER_EXCLUSIVE}"),
        ));
    }
    u32::try_from(value)
        .map(FieldValue::Age)
        .map_err(|_| FieldError::constraint("age", "out of range"))
}

fn email_field(
    raw: Option<&Value>,
    observer: &dyn ValidationObserver,
) -> Result<FieldValue, FieldError> {
    let value = expect_str("email", required("email", raw)?)?;
    email::validate_email_syntax(value).map_err(|kind| FieldError::new("email", kind))?;
    match email::validate_email_domain(value) {
        Ok(domain) => {
            observer.on_stage(&ValidationStage::EmailDomainChecked {
                domain,
                accepted: true,
            });
            Ok(FieldValue::Email(email::normalize_email(value)))
        }
        Err(kind) => {
            if let FieldErrorKind::InvalidDomain { domain, .. } = &kind {
                observer.on_stage(&ValidationStage::EmailDomainChecked {
                    domain,
                    accepted: false,
                });
            }
            Err(FieldError::new("email", kind))
        }
    }
}

fn weight(raw: Option<&Value>, _observer: &dyn ValidationObserver) -> Result<FieldValue, FieldError> {
    let value = expect_number("weight", required("weight", raw)?)?;
    expect_positive("weight", value).map(FieldValue::Weight)
}

fn height(raw: Option<&Value>, _observer: &dyn ValidationObserver) -> Result<FieldValue, FieldError> {
    let value = expect_number("height", required("height", raw)?)?;
    expect_positive("height", value).map(FieldValue::Height)
}

fn married(raw: Option<&Value>, _observer: &dyn ValidationObserver) -> Result<FieldValue, FieldError> {
    match raw {
        None => Ok(FieldValue::Married(false)),
        Some(value) => expect_bool("married", value).map(FieldValue::Married),
    }
}

fn allergies(
    raw: Option<&Value>,
    _observer: &dyn ValidationObserver,
) -> Result<FieldValue, FieldError> {
    let items = match raw {
        None | Some(Value::Null) => return Ok(FieldValue::Allergies(None)),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(FieldError::new(
                "allergies",
                FieldErrorKind::WrongType { expected: "array of strings" },
            ))
        }
    };
    if items.len() > ALLERGIES_MAX_ITEMS {
        return Err(FieldError::constraint(
            "allergies",
            format!(
                "must have at most {ALLERGIES_MAX_ITEMS} items, got {}",
                items.len()
            ),
        ));
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            expect_str(&format!("allergies.{i}"), item).map(ToString::to_string)
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|list| FieldValue::Allergies(Some(list)))
}

fn contact_details(
    raw: Option<&Value>,
    _observer: &dyn ValidationObserver,
) -> Result<FieldValue, FieldError> {
    let map = required("contact_details", raw)?.as_object().ok_or_else(|| {
        FieldError::new(
            "contact_details",
            FieldErrorKind::WrongType { expected: "object of strings" },
        )
    })?;
    map.iter()
        .map(|(key, value)| {
            expect_str(&format!("contact_details.{key}"), value)
                .map(|v| (key.clone(), v.to_string()))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()
        .map(FieldValue::ContactDetails)
}

fn address(raw: Option<&Value>, _observer: &dyn ValidationObserver) -> Result<FieldValue, FieldError> {
    let map = required("address", raw)?.as_object().ok_or_else(|| {
        FieldError::new("address", FieldErrorKind::WrongType { expected: "object" })
    })?;

    let city = address_text(map, "city")
        .and_then(|city| expect_non_empty("city", city))
        .map_err(nested_in_address)?;
    let state = address_text(map, "state")
        .and_then(|state| expect_non_empty("state", state))
        .map_err(nested_in_address)?;
    let pin_code = address_text(map, "pin_code")
        .and_then(|pin| {
            if pin.len() == PIN_CODE_DIGITS && pin.bytes().all(|b| b.is_ascii_digit()) {
                Ok(pin.to_string())
            } else {
                Err(FieldError::constraint(
                    "pin_code",
                    format!("must be exactly {PIN_CODE_DIGITS} digits"),
                ))
            }
        })
        .map_err(nested_in_address)?;

    Ok(FieldValue::Address(Address::from_validated(
        city, state, pin_code,
    )))
}

fn address_text<'v>(map: &'v Map<String, Value>, field: &str) -> Result<&'v str, FieldError> {
    expect_str(field, required(field, map.get(field))?)
}

fn nested_in_address(err: FieldError) -> FieldError {
    err.nested_in("address")
}
