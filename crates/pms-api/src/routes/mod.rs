//! # API Route Modules
//!
//! - `info`: home and about messages.
//! - `patients`: browse the records file: list all, view one, sort.
//! - `validation`: run the patient validator over a submitted record.

pub mod info;
pub mod patients;
pub mod validation;
