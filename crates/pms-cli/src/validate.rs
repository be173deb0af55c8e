//! # Validate Subcommand
//!
//! Validates a patient record stored as a JSON file. Prints the normalized
//! patient on success, or one line per failure.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use pms_core::{Patient, PatientValidator, PmsError, ValidationError, ValidationMode};

/// Arguments for the `pms validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON file holding one patient record.
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Report every failing field instead of stopping at the first.
    #[arg(long)]
    pub all_errors: bool,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the record is valid, 1 when it is rejected.
/// Unreadable files and malformed JSON are returned as errors.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let mode = if args.all_errors {
        ValidationMode::CollectAll
    } else {
        ValidationMode::FailFast
    };

    match validate_file(&args.path, mode) {
        Ok(patient) => {
            println!("{}", serde_json::to_string_pretty(&patient)?);
            println!("OK: {}", args.path.display());
            Ok(0)
        }
        Err(PmsError::Validation(err)) => {
            print_failures(&args.path, &err);
            Ok(1)
        }
        Err(err) => Err::<u8, _>(err)
            .with_context(|| format!("failed to validate {}", args.path.display())),
    }
}

fn validate_file(path: &Path, mode: ValidationMode) -> Result<Patient, PmsError> {
    let file = File::open(path)?;
    tracing::debug!(path = %path.display(), ?mode, "validating patient file");
    PatientValidator::new()
        .mode(mode)
        .validate_reader(BufReader::new(file))
}

fn print_failures(path: &Path, err: &ValidationError) {
    println!("FAIL: {}", path.display());
    match err {
        ValidationError::Fields(errors) => {
            for error in errors {
                println!("  {error}");
            }
        }
        ValidationError::Record(record) => println!("  {record}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const VALID: &str = r#"{
        "name": "John Doe", "age": 30, "email": "john@icici.com",
        "weight": 70.0, "height": 1.75,
        "contact_details": {"phone": "123"},
        "address": {"city": "Mumbai", "state": "Maharashtra", "pin_code": "400001"}
    }"#;

    const INVALID: &str = r#"{
        "name": "John Doe", "age": 0, "email": "john@gmail.com",
        "weight": 70.0, "height": 1.75,
        "contact_details": {},
        "address": {"city": "Mumbai", "state": "Maharashtra", "pin_code": "400001"}
    }"#;

    fn args(file: &tempfile::NamedTempFile, all_errors: bool) -> ValidateArgs {
        ValidateArgs {
            path: file.path().to_path_buf(),
            all_errors,
        }
    }

    #[test]
    fn valid_file_exits_zero() {
        let file = write_file(VALID);
        assert_eq!(run_validate(&args(&file, false)).unwrap(), 0);
    }

    #[test]
    fn rejected_file_exits_one() {
        let file = write_file(INVALID);
        assert_eq!(run_validate(&args(&file, false)).unwrap(), 1);
        assert_eq!(run_validate(&args(&file, true)).unwrap(), 1);
    }

    #[test]
    fn all_errors_collects_every_field() {
        let file = write_file(INVALID);
        match validate_file(file.path(), ValidationMode::CollectAll) {
            Err(PmsError::Validation(ValidationError::Fields(errors))) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, ["age", "email"]);
            }
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn fail_fast_reports_first_field() {
        let file = write_file(INVALID);
        match validate_file(file.path(), ValidationMode::FailFast) {
            Err(PmsError::Validation(ValidationError::Fields(errors))) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "age");
            }
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_an_error() {
        let file = write_file("{not json");
        assert!(run_validate(&args(&file, false)).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let args = ValidateArgs {
            path: PathBuf::from("/nonexistent/patient.json"),
            all_errors: false,
        };
        assert!(run_validate(&args).is_err());
    }
}
