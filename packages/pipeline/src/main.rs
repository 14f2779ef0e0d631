#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the crime rate pipeline.
//!
//! Run with no arguments to read `population_state.csv` and
//! `crime_district.csv` from the current directory and write
//! `crime_district_cleaned.csv` next to them.

use std::path::PathBuf;

use clap::Parser;
use crime_rate_cli_utils::IndicatifProgress;
use crime_rate_pipeline::{PIPELINE_STEPS, load_config, run};
use crime_rate_pipeline_models::{MissingPopulationPolicy, OutputOrder, PipelineConfig};

#[derive(Parser)]
#[command(
    name = "crime_rate",
    about = "Computes crimes per 10,000 population for each region"
)]
struct Cli {
    /// TOML configuration file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory relative input and output paths are resolved against
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Population input file
    #[arg(long)]
    population: Option<PathBuf>,
    /// Crime input file
    #[arg(long)]
    crime: Option<PathBuf>,
    /// Output file (overwritten)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Reference year selected from both datasets
    #[arg(long)]
    year: Option<i32>,
    /// What to do with regions that have no population: `warn` or `fail`
    #[arg(long)]
    on_missing_population: Option<MissingPopulationPolicy>,
    /// Fail instead of writing an empty table when filters remove every row
    #[arg(long)]
    fail_on_empty: bool,
    /// Output row order: `region` or `rate`
    #[arg(long)]
    sort: Option<OutputOrder>,
}

impl Cli {
    fn into_config(self) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(population) = self.population {
            config.population_file = population;
        }
        if let Some(crime) = self.crime {
            config.crime_file = crime;
        }
        if let Some(output) = self.output {
            config.output_file = output;
        }
        if let Some(year) = self.year {
            config.reference_year = year;
        }
        if let Some(policy) = self.on_missing_population {
            config.on_missing_population = policy;
        }
        if self.fail_on_empty {
            config.fail_on_empty = true;
        }
        if let Some(sort) = self.sort {
            config.sort = sort;
        }

        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_rate_cli_utils::init_logger();
    let config = Cli::parse().into_config()?;

    log::debug!("Running with {config:?}");

    let progress = IndicatifProgress::steps_bar(&multi, "Crime rate pipeline", PIPELINE_STEPS);
    let report = run(&config, &progress)?;

    log::info!(
        "Done: {} regions written to {} in {:.2}s",
        report.rows_written,
        report.output_path.display(),
        report.duration.as_secs_f64(),
    );
    if !report.zero_population.is_empty() {
        log::warn!(
            "Regions with zero population: {}",
            report.zero_population.join(", ")
        );
    }

    Ok(())
}
