#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pipeline configuration, run report, and progress reporting types.
//!
//! This crate contains only data types and the [`progress::ProgressCallback`]
//! trait. It has no I/O; loading configuration from disk and running the
//! pipeline live in `crime_rate_pipeline`.

pub mod progress;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crime_rate_crime_models::{CrimeFilter, FilterReport};
use crime_rate_population_models::{DEFAULT_REFERENCE_YEAR, DemographicSlice};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default population input file name.
pub const DEFAULT_POPULATION_FILE: &str = "population_state.csv";

/// Default crime input file name.
pub const DEFAULT_CRIME_FILE: &str = "crime_district.csv";

/// Default output file name.
pub const DEFAULT_OUTPUT_FILE: &str = "crime_district_cleaned.csv";

/// What to do when an aggregated region has no population entry.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MissingPopulationPolicy {
    /// Emit the row with an empty rate and log a warning.
    #[default]
    Warn,
    /// Abort the run.
    Fail,
}

/// Row order of the written output table.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutputOrder {
    /// Alphabetical by region.
    #[default]
    Region,
    /// Highest rate first, missing rates last.
    Rate,
}

/// Full configuration of one pipeline run.
///
/// Every field has a default, so an empty TOML document (or none at all)
/// reproduces the standard file names and filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory relative file names are resolved against.
    pub data_dir: PathBuf,
    /// Population input file.
    pub population_file: PathBuf,
    /// Crime input file.
    pub crime_file: PathBuf,
    /// Output file, overwritten on every run.
    pub output_file: PathBuf,
    /// Year selected from both datasets.
    pub reference_year: i32,
    /// Demographic slice selecting one population per region.
    pub slice: DemographicSlice,
    /// Crime filter parameters. Its `year` is replaced by
    /// [`Self::reference_year`] when the run starts.
    pub crime: CrimeFilter,
    /// Handling of regions without a population entry.
    pub on_missing_population: MissingPopulationPolicy,
    /// Abort instead of writing an empty table when the filters leave no
    /// rows.
    pub fail_on_empty: bool,
    /// Row order of the written table.
    pub sort: OutputOrder,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            population_file: PathBuf::from(DEFAULT_POPULATION_FILE),
            crime_file: PathBuf::from(DEFAULT_CRIME_FILE),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            reference_year: DEFAULT_REFERENCE_YEAR,
            slice: DemographicSlice::default(),
            crime: CrimeFilter::default(),
            on_missing_population: MissingPopulationPolicy::default(),
            fail_on_empty: false,
            sort: OutputOrder::default(),
        }
    }
}

impl PipelineConfig {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// Population file resolved against [`Self::data_dir`].
    #[must_use]
    pub fn population_path(&self) -> PathBuf {
        self.resolve(&self.population_file)
    }

    /// Crime file resolved against [`Self::data_dir`].
    #[must_use]
    pub fn crime_path(&self) -> PathBuf {
        self.resolve(&self.crime_file)
    }

    /// Output file resolved against [`Self::data_dir`].
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_file)
    }

    /// Crime filter with the run's reference year applied.
    #[must_use]
    pub fn crime_filter(&self) -> CrimeFilter {
        CrimeFilter {
            year: self.reference_year,
            ..self.crime.clone()
        }
    }
}

/// Summary of a completed pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Population records loaded.
    pub population_records: usize,
    /// Regions with a population in the reference year.
    pub population_regions: usize,
    /// Crime filter stage counts.
    pub crime: FilterReport,
    /// Rows written to the output table.
    pub rows_written: usize,
    /// Regions written without a rate because their population is missing.
    pub missing_population: Vec<String>,
    /// Regions written without a rate because their population is zero.
    pub zero_population: Vec<String>,
    /// Where the output table was written.
    pub output_path: PathBuf,
    /// How long the run took.
    pub duration: Duration,
}
