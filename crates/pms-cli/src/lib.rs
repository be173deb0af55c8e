//! # pms-cli: CLI Tool for the Patient Management System
//!
//! Provides the `pms` command-line interface over `pms-core`.
//!
//! ## Subcommands
//!
//! - `pms demo`: Build and print the canonical example patient.
//! - `pms validate`: Validate a patient record stored as JSON.
//!
//! ```bash
//! pms demo
//! pms validate patient.json --all-errors
//! ```
//!
//! Exit codes: 0 on success, 1 when a record is rejected, 2 on operational
//! errors (unreadable file, malformed JSON).

pub mod demo;
pub mod validate;
