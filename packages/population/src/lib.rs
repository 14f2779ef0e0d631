#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Population dataset loader and per-region population extraction.
//!
//! [`load_population`] reads the population CSV into
//! [`PopulationRecord`]s and [`extract_population`] reduces them to one
//! absolute population per region for a demographic slice and year.

mod extract;
mod load;

pub use crime_rate_population_models::{
    DemographicSlice, PopulationLookup, PopulationRecord, Sex,
};
pub use extract::extract_population;
pub use load::{REQUIRED_COLUMNS, load_population, read_population};

use crime_rate_table::TableError;

/// Errors that can occur while loading population data.
#[derive(Debug, thiserror::Error)]
pub enum PopulationError {
    /// Reading or parsing the population table failed.
    #[error("Population table error: {0}")]
    Table(#[from] TableError),
}
