//! Population CSV reader.

use std::io::Read;
use std::path::Path;

use crime_rate_population_models::{PopulationRecord, Sex};
use crime_rate_table::{parse_date, read_table, read_table_from_path};
use serde::Deserialize;

use crate::PopulationError;

/// Columns the population file must provide.
pub const REQUIRED_COLUMNS: &[&str] = &["state", "sex", "age", "ethnicity", "date", "population"];

/// A raw row from the population CSV.
#[derive(Debug, Deserialize)]
struct PopulationRow {
    #[serde(rename = "state")]
    region: String,
    sex: String,
    #[serde(rename = "age")]
    age_group: String,
    ethnicity: String,
    date: String,
    population: Option<f64>,
}

impl PopulationRow {
    fn into_record(self) -> Result<PopulationRecord, PopulationError> {
        Ok(PopulationRecord {
            date: parse_date(&self.date)?,
            region: self.region,
            sex: Sex::from(self.sex),
            age_group: self.age_group,
            ethnicity: self.ethnicity,
            population: self.population,
        })
    }
}

/// Reads population records from any CSV source.
///
/// # Errors
///
/// Returns [`PopulationError::Table`] if a required column is missing,
/// a row is malformed, or a date cannot be parsed.
pub fn read_population(
    reader: impl Read,
    table: &str,
) -> Result<Vec<PopulationRecord>, PopulationError> {
    read_table::<PopulationRow, _>(reader, table, REQUIRED_COLUMNS)?
        .into_iter()
        .map(PopulationRow::into_record)
        .collect()
}

/// Loads the population file at `path`.
///
/// # Errors
///
/// Returns [`PopulationError::Table`] if the file cannot be opened or any
/// error described on [`read_population`] occurs.
pub fn load_population(path: &Path) -> Result<Vec<PopulationRecord>, PopulationError> {
    log::info!("Loading population data from {}", path.display());

    let records = read_table_from_path::<PopulationRow>(path, REQUIRED_COLUMNS)?
        .into_iter()
        .map(PopulationRow::into_record)
        .collect::<Result<Vec<_>, _>>()?;

    log::info!("Loaded {} population records", records.len());

    Ok(records)
}
