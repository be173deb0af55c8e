//! # Patient Records File
//!
//! Read-only access to the JSON records file served by the browse endpoints.
//! The file is an object keyed by patient id:
//!
//! ```json
//! { "P001": { "name": "Ananya Verma", "city": "Guwahati", "age": 28, ... } }
//! ```
//!
//! The file is re-read on every request, so edits are picked up without a
//! restart. Entry order follows the file.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::AppError;

/// One row of the records file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientRecord {
    pub name: String,
    pub city: String,
    pub age: u32,
    pub gender: String,
    /// Height in meters.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
    pub bmi: f64,
    /// BMI category, e.g. "Normal" or "Obese".
    pub verdict: String,
}

/// Errors reading the records file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON object of patient records.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record under `id` does not have the expected shape.
    #[error("malformed record {id} in {}: {source}", .path.display())]
    Record {
        path: PathBuf,
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Handle to the records file.
#[derive(Debug, Clone)]
pub struct PatientStore {
    path: PathBuf,
}

impl PatientStore {
    /// Store backed by the file at `path`. The file is not touched until
    /// [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole file.
    pub async fn load(&self) -> Result<PatientTable, StoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;
        let raw: Map<String, Value> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let entries = raw
            .into_iter()
            .map(|(id, value)| {
                serde_json::from_value::<PatientRecord>(value)
                    .map(|record| (id.clone(), record))
                    .map_err(|source| StoreError::Record {
                        path: self.path.clone(),
                        id,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(path = %self.path.display(), count = entries.len(), "loaded patient records");
        Ok(PatientTable { entries })
    }
}

/// Parsed records, in file order. Serializes as an id → record object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientTable {
    entries: Vec<(String, PatientRecord)>,
}

impl PatientTable {
    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&PatientRecord> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, record)| record)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records sorted by `field`. The sort is stable: ties keep file order
    /// in both directions.
    pub fn into_sorted(self, field: SortField, order: SortOrder) -> Vec<PatientRecord> {
        let mut records: Vec<_> = self.entries.into_iter().map(|(_, r)| r).collect();
        records.sort_by(|a, b| {
            let (a, b) = (field.key(a), field.key(b));
            match order {
                SortOrder::Ascending => a.total_cmp(&b),
                SortOrder::Descending => b.total_cmp(&a),
            }
        });
        records
    }
}

impl FromIterator<(String, PatientRecord)> for PatientTable {
    fn from_iter<I: IntoIterator<Item = (String, PatientRecord)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for PatientTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, record) in &self.entries {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

/// Numeric column to sort records by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl SortField {
    /// Accepted query values, in documentation order.
    pub const NAMES: [&'static str; 3] = ["height", "weight", "bmi"];

    fn key(self, record: &PatientRecord) -> f64 {
        match self {
            Self::Height => record.height,
            Self::Weight => record.weight,
            Self::Bmi => record.bmi,
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "height" => Ok(Self::Height),
            "weight" => Ok(Self::Weight),
            "bmi" => Ok(Self::Bmi),
            _ => Err(format!("Invalid field. Select from {:?}", Self::NAMES)),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(Self::Ascending),
            "descending" => Ok(Self::Descending),
            _ => Err("Invalid order. Select between ascending and descending".to_string()),
        }
    }
}
