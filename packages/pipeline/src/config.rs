//! TOML configuration loading.
//!
//! Every key is optional; see [`PipelineConfig`] for the defaults. A full
//! file looks like:
//!
//! ```toml
//! data_dir = "data"
//! population_file = "population_state.csv"
//! crime_file = "crime_district.csv"
//! output_file = "crime_district_cleaned.csv"
//! reference_year = 2016
//! on_missing_population = "warn"
//! fail_on_empty = false
//! sort = "region"
//!
//! [slice]
//! sex = "both"
//! age_group = "overall"
//! ethnicity = "overall"
//!
//! [crime]
//! excluded_regions = ["Malaysia"]
//! aggregate_district = "All"
//! aggregate_type = "all"
//! categories = ["assault", "property"]
//! ```

use std::path::Path;

use crime_rate_pipeline_models::PipelineConfig;

use crate::PipelineError;

/// Parses a TOML document into a [`PipelineConfig`].
///
/// # Errors
///
/// Returns the TOML error if the document is malformed or a value has the
/// wrong type.
pub fn parse_config(text: &str) -> Result<PipelineConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Reads and parses the TOML configuration file at `path`.
///
/// # Errors
///
/// Returns [`PipelineError::ConfigRead`] if the file cannot be read and
/// [`PipelineError::ConfigParse`] if it is not a valid configuration.
pub fn load_config(path: &Path) -> Result<PipelineConfig, PipelineError> {
    let text = std::fs::read_to_string(path).map_err(|source| PipelineError::ConfigRead {
        path: path.display().to_string(),
        source,
    })?;

    let config = parse_config(&text).map_err(|source| PipelineError::ConfigParse {
        path: path.display().to_string(),
        source,
    })?;

    log::debug!("Loaded configuration from {}", path.display());

    Ok(config)
}
