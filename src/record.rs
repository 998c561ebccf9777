//! Benchmark records and the delimited-text loader.
//!
//! Input is a CSV file with a header row. The columns `Operation`,
//! `Database`, `EntityType`, `Scale`, `EntityCount` and `ElapsedUs` are
//! required; any other column (such as `Date`) is ignored.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::io;
use std::path::Path;
use tracing::debug;

/// Columns every input file must carry, in the order they are checked.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Operation",
    "Database",
    "EntityType",
    "Scale",
    "EntityCount",
    "ElapsedUs",
];

/// Microseconds per millisecond.
const MICROS_PER_MILLI: f64 = 1000.0;

/// One timing measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRecord {
    /// Benchmarked API call, e.g. `GetByIdAsync`.
    pub operation: String,
    /// Backend under test.
    pub database: String,
    /// Domain entity the call operated on.
    pub entity_type: String,
    scale: f64,
    entity_count: f64,
    elapsed_micros: f64,
}

impl BenchmarkRecord {
    /// Create a record.
    #[must_use]
    pub fn new(
        operation: impl Into<String>,
        database: impl Into<String>,
        entity_type: impl Into<String>,
        scale: f64,
        entity_count: f64,
        elapsed_micros: f64,
    ) -> Self {
        Self {
            operation: operation.into(),
            database: database.into(),
            entity_type: entity_type.into(),
            scale,
            entity_count,
            elapsed_micros,
        }
    }

    /// Dataset size multiplier for the run.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Entities involved in this invocation.
    #[must_use]
    pub fn entity_count(&self) -> f64 {
        self.entity_count
    }

    /// Measured duration in microseconds.
    #[must_use]
    pub fn elapsed_micros(&self) -> f64 {
        self.elapsed_micros
    }

    /// Measured duration in milliseconds.
    #[must_use]
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed_micros / MICROS_PER_MILLI
    }
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Operation")]
    operation: String,
    #[serde(rename = "Database")]
    database: String,
    #[serde(rename = "EntityType")]
    entity_type: String,
    #[serde(rename = "Scale")]
    scale: f64,
    #[serde(rename = "EntityCount")]
    entity_count: f64,
    #[serde(rename = "ElapsedUs")]
    elapsed_us: f64,
}

impl From<RawRecord> for BenchmarkRecord {
    fn from(raw: RawRecord) -> Self {
        Self::new(
            raw.operation,
            raw.database,
            raw.entity_type,
            raw.scale,
            raw.entity_count,
            raw.elapsed_us,
        )
    }
}

/// Load all records from a CSV file.
///
/// # Errors
///
/// Returns [`Error::DataLoad`] if the file is missing, unreadable or holds a
/// malformed row, and [`Error::MissingColumn`] if a required column is absent.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<BenchmarkRecord>> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| Error::DataLoad {
        path: origin.clone(),
        message: e.to_string(),
    })?;
    load_records_from_reader(io::BufReader::new(file), &origin)
}

/// Load all records from any reader. `origin` names the source in errors.
///
/// # Errors
///
/// Same as [`load_records`].
pub fn load_records_from_reader<R: io::Read>(reader: R, origin: &str) -> Result<Vec<BenchmarkRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| load_error(origin, &e))?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::MissingColumn {
                path: origin.to_string(),
                column,
            });
        }
    }

    let records = reader
        .deserialize::<RawRecord>()
        .map(|row| row.map(BenchmarkRecord::from).map_err(|e| load_error(origin, &e)))
        .collect::<Result<Vec<_>>>()?;

    debug!(origin, records = records.len(), "loaded benchmark records");
    Ok(records)
}

fn load_error(origin: &str, err: &csv::Error) -> Error {
    let message = match err.position() {
        Some(pos) => format!("line {}: {err}", pos.line()),
        None => err.to_string(),
    };
    Error::DataLoad {
        path: origin.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const HEADER: &str = "Operation,Database,ElapsedUs,EntityType,EntityCount,Date,Scale\n";

    #[test]
    fn test_loads_rows_in_order_with_millis() {
        let input = format!(
            "{HEADER}GetByIdAsync,A,2000,Athlete,1,2024-01-01,1\nGetByIdAsync,B,3000,Athlete,1,2024-01-01,1\n"
        );
        let records = load_records_from_reader(input.as_bytes(), "mem").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].database, "A");
        assert_relative_eq!(records[0].elapsed_millis(), 2.0);
        assert_relative_eq!(records[1].elapsed_millis(), 3.0);
    }

    #[test]
    fn test_numeric_accessors_follow_constructor() {
        let record = BenchmarkRecord::new("GetAllAsync", "A", "Team", 2.5, 40.0, 1250.0);
        assert_relative_eq!(record.scale(), 2.5);
        assert_relative_eq!(record.entity_count(), 40.0);
        assert_relative_eq!(record.elapsed_micros(), 1250.0);
        assert_relative_eq!(record.elapsed_millis(), 1.25);

        let copy = record.clone();
        assert_relative_eq!(copy.elapsed_millis(), copy.elapsed_micros() / 1000.0);
    }

    #[test]
    fn test_header_only_is_empty() {
        let records = load_records_from_reader(HEADER.as_bytes(), "mem").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_fields_are_trimmed() {
        let input = format!("{HEADER} UpdateAsync , Mongo , 1500 , Team , 10 , x , 2 \n");
        let records = load_records_from_reader(input.as_bytes(), "mem").unwrap();
        assert_eq!(records[0].operation, "UpdateAsync");
        assert_eq!(records[0].database, "Mongo");
        assert_relative_eq!(records[0].scale(), 2.0);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let input = "Operation,Database,EntityType,Scale,EntityCount\nA,B,C,1,1\n";
        let err = load_records_from_reader(input.as_bytes(), "mem").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column: "ElapsedUs", .. }));
        assert!(err.is_data_load());
    }

    #[test]
    fn test_malformed_number_fails_whole_load_with_line() {
        let input = format!("{HEADER}GetAllAsync,A,100,T,1,x,1\nGetAllAsync,A,fast,T,1,x,1\n");
        let err = load_records_from_reader(input.as_bytes(), "mem").unwrap_err();
        assert!(err.is_data_load());
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn test_missing_file_is_data_load() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(dir.path().join("absent.csv")).unwrap_err();
        assert!(err.is_data_load());
    }

    proptest! {
        #[test]
        fn prop_millis_is_micros_over_thousand(micros in 0.0f64..1e12) {
            let record = BenchmarkRecord::new("op", "db", "e", 1.0, 1.0, micros);
            prop_assert!((record.elapsed_millis() - micros / 1000.0).abs() <= f64::EPSILON * micros.max(1.0));
        }
    }
}
