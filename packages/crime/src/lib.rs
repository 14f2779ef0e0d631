#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime dataset loader, structural filters, and per-region rate
//! aggregation.
//!
//! The aggregation narrows the crime records through the stages listed in
//! [`FilterStage`], sums the selected categories per region, joins each
//! region against a [`PopulationLookup`], and normalizes the total to
//! crimes per 10,000 residents.

mod aggregate;
mod filter;
mod load;

pub use aggregate::aggregate_crime;
pub use crime_rate_crime_models::{
    AggregationOutcome, CrimeFilter, CrimeRecord, CrimeSummaryRow, FilterReport, FilterStage,
    ranked,
};
pub use filter::apply_filters;
pub use crime_rate_population_models::PopulationLookup;
pub use load::{OPTIONAL_COLUMNS, REQUIRED_COLUMNS, load_crime, read_crime};

use crime_rate_table::TableError;

/// Errors that can occur while loading crime data.
#[derive(Debug, thiserror::Error)]
pub enum CrimeError {
    /// Reading or parsing the crime table failed.
    #[error("Crime table error: {0}")]
    Table(#[from] TableError),
}
