//! Crime CSV reader.

use std::io::Read;
use std::path::Path;

use crime_rate_crime_models::CrimeRecord;
use crime_rate_table::{parse_date, read_table, read_table_from_path};
use serde::Deserialize;

use crate::CrimeError;

/// Columns the crime file must provide.
pub const REQUIRED_COLUMNS: &[&str] = &["state", "district", "category", "date", "crimes"];

/// Columns read when present.
pub const OPTIONAL_COLUMNS: &[&str] = &["type"];

/// A raw row from the crime CSV.
#[derive(Debug, Deserialize)]
struct CrimeRow {
    #[serde(rename = "state")]
    region: String,
    district: String,
    category: String,
    #[serde(rename = "type", default)]
    crime_type: Option<String>,
    date: String,
    crimes: u64,
}

impl CrimeRow {
    fn into_record(self) -> Result<CrimeRecord, CrimeError> {
        Ok(CrimeRecord {
            date: parse_date(&self.date)?,
            region: self.region,
            district: self.district,
            category: self.category,
            crime_type: self.crime_type,
            crimes: self.crimes,
        })
    }
}

fn into_records(rows: Vec<CrimeRow>) -> Result<Vec<CrimeRecord>, CrimeError> {
    rows.into_iter().map(CrimeRow::into_record).collect()
}

/// Reads crime records from any CSV source.
///
/// # Errors
///
/// Returns [`CrimeError::Table`] if a required column is missing, a row
/// is malformed, or a date cannot be parsed.
pub fn read_crime(reader: impl Read, table: &str) -> Result<Vec<CrimeRecord>, CrimeError> {
    into_records(read_table(reader, table, REQUIRED_COLUMNS)?)
}

/// Loads the crime file at `path`.
///
/// # Errors
///
/// Returns [`CrimeError::Table`] if the file cannot be opened or any
/// error described on [`read_crime`] occurs.
pub fn load_crime(path: &Path) -> Result<Vec<CrimeRecord>, CrimeError> {
    log::info!("Loading crime data from {}", path.display());

    let records = into_records(read_table_from_path(path, REQUIRED_COLUMNS)?)?;

    let with_type = records.iter().filter(|r| r.crime_type.is_some()).count();
    log::info!(
        "Loaded {} crime records ({with_type} with an offense type)",
        records.len()
    );

    Ok(records)
}
