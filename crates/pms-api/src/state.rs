//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor, and the environment-driven configuration it is
//! built from.

use std::path::PathBuf;

use pms_core::{PatientValidator, ValidationMode};

use crate::store::PatientStore;

/// Default location of the records file, relative to the working directory.
pub const DEFAULT_PATIENTS_FILE: &str = "data/patients.json";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Path of the JSON records file served by the browse endpoints.
    pub patients_file: PathBuf,
    /// Log output format.
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Build configuration from `PORT`, `PATIENTS_FILE` and `LOG_FORMAT`,
    /// falling back to defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let patients_file = lookup("PATIENTS_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.patients_file);
        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        Self {
            port,
            patients_file,
            log_format,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            patients_file: PathBuf::from(DEFAULT_PATIENTS_FILE),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: PatientStore,
    /// Reports every failing field so 422 responses list them all.
    pub validator: PatientValidator,
    pub config: AppConfig,
}

impl AppState {
    /// State with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// State for the given configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            store: PatientStore::new(config.patients_file.clone()),
            validator: PatientValidator::new().mode(ValidationMode::CollectAll),
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
