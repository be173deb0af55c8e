//! # Address
//!
//! Value object embedded in every [`Patient`](crate::Patient). Has no
//! identity of its own and is only constructed by the validator.

use serde::{Deserialize, Serialize};

/// A validated postal address.
///
/// `city` and `state` are non-empty; `pin_code` is a 6-digit PIN code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    city: String,
    state: String,
    pin_code: String,
}

impl Address {
    /// Build an address from parts that already passed field validation.
    pub(crate) fn from_validated(city: String, state: String, pin_code: String) -> Self {
        Self {
            city,
            state,
            pin_code,
        }
    }

    /// City name.
    pub fn city(&self) -> &str {
        &self.city
    }

    /// State name or code.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// PIN code (6 digits).
    pub fn pin_code(&self) -> &str {
        &self.pin_code
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {} {}", self.city, self.state, self.pin_code)
    }
}

/// Unvalidated address input, used to build a [`PatientInput`](crate::PatientInput).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInput {
    /// City name.
    pub city: String,
    /// State name or code.
    pub state: String,
    /// PIN code.
    pub pin_code: String,
}

impl AddressInput {
    /// Convenience constructor.
    pub fn new(
        city: impl Into<String>,
        state: impl Into<String>,
        pin_code: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
            pin_code: pin_code.into(),
        }
    }
}
