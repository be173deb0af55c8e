//! # Demo Subcommand
//!
//! Builds the canonical example patient and prints it with its BMI. Every
//! validation stage is logged as it happens.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::Args;

use pms_core::{AddressInput, PatientInput, PatientValidator, ValidationStage};

/// Arguments for the `pms demo` subcommand.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Print the patient as compact JSON instead of pretty JSON.
    #[arg(long)]
    pub compact: bool,
}

/// The example record: a 65-year-old with an emergency contact.
pub fn example_input() -> PatientInput {
    PatientInput {
        name: "John Doe".into(),
        age: 65,
        email: "john@hdfc.com".into(),
        weight: 70.0,
        height: 1.75,
        married: false,
        allergies: None,
        contact_details: BTreeMap::from([("emergency".to_string(), "1234567890".to_string())]),
        address: AddressInput::new("Mumbai", "MH", "400001"),
    }
}

/// Execute the demo subcommand.
pub fn run_demo(args: &DemoArgs) -> Result<u8> {
    let validator = PatientValidator::with_observer(|stage: &ValidationStage<'_>| {
        tracing::info!(?stage, "validation step");
    });
    let patient = validator
        .validate(&example_input().into_raw())
        .context("example patient was rejected")?;

    let json = if args.compact {
        serde_json::to_string(&patient)?
    } else {
        serde_json::to_string_pretty(&patient)?
    };
    println!("{json}");
    println!("BMI: {:.2}", patient.bmi());
    Ok(0)
}
