#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-region crime rate pipeline.
//!
//! [`run`] loads the population table, extracts one population per region
//! for the configured slice and year, loads the crime table, aggregates
//! the selected categories per region, normalizes each total to crimes per
//! 10,000 residents, and writes the result table.

pub mod config;

use std::sync::Arc;
use std::time::Instant;

use crime_rate_crime::{CrimeError, aggregate_crime, load_crime};
use crime_rate_crime_models::{CrimeSummaryRow, FilterStage, SUMMARY_COLUMNS, ranked};
use crime_rate_pipeline_models::progress::ProgressCallback;
use crime_rate_pipeline_models::{
    MissingPopulationPolicy, OutputOrder, PipelineConfig, PipelineReport,
};
use crime_rate_population::{PopulationError, extract_population, load_population};
use crime_rate_table::{TableError, write_table_to_path};

pub use config::{load_config, parse_config};

/// Number of steps reported to the progress callback.
pub const PIPELINE_STEPS: u64 = 4;

/// Errors that can abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The population table could not be loaded.
    #[error(transparent)]
    Population(#[from] PopulationError),

    /// The crime table could not be loaded.
    #[error(transparent)]
    Crime(#[from] CrimeError),

    /// The output table could not be written.
    #[error("Output error: {0}")]
    Output(#[from] TableError),

    /// The configuration file could not be read.
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        /// Path to the configuration file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`PipelineConfig`].
    #[error("Invalid config {path}: {source}")]
    ConfigParse {
        /// Path to the configuration file.
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// Aggregated regions have no population and the policy is
    /// [`MissingPopulationPolicy::Fail`].
    #[error("No population for regions: {}", regions.join(", "))]
    MissingPopulation {
        /// Regions without a population entry.
        regions: Vec<String>,
    },

    /// The filters left nothing to aggregate and `fail_on_empty` is set.
    #[error("No crime rows left after filtering (emptied at stage {stage:?})")]
    EmptyResult {
        /// First stage that removed every remaining row, if any.
        stage: Option<FilterStage>,
    },
}

/// Runs the pipeline described by `config`, writing the output table and
/// returning a summary of the run.
///
/// # Errors
///
/// Returns [`PipelineError`] if an input cannot be loaded, the output
/// cannot be written, or a configured data-quality policy rejects the
/// result.
pub fn run(
    config: &PipelineConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<PipelineReport, PipelineError> {
    let start = Instant::now();
    progress.set_total(PIPELINE_STEPS);

    let result = run_steps(config, progress.as_ref(), start);

    match &result {
        Ok(report) => progress.finish(format!(
            "{} regions written in {:.1}s",
            report.rows_written,
            report.duration.as_secs_f64()
        )),
        Err(e) => progress.finish(format!("Failed: {e}")),
    }

    result
}

fn run_steps(
    config: &PipelineConfig,
    progress: &dyn ProgressCallback,
    start: Instant,
) -> Result<PipelineReport, PipelineError> {
    // ── Population ──────────────────────────────────────────────────
    progress.set_message("Extracting population".to_string());
    let population_records = load_population(&config.population_path())?;
    let population =
        extract_population(&population_records, &config.slice, config.reference_year);
    progress.inc(1);

    // ── Crime ───────────────────────────────────────────────────────
    progress.set_message("Aggregating crime".to_string());
    let crime_records = load_crime(&config.crime_path())?;
    let outcome = aggregate_crime(&crime_records, &population, &config.crime_filter());
    progress.inc(1);

    // ── Data quality ────────────────────────────────────────────────
    progress.set_message("Checking result".to_string());
    if !outcome.missing_population.is_empty() {
        match config.on_missing_population {
            MissingPopulationPolicy::Warn => log::warn!(
                "{} region(s) have no population and were written without a rate: {}",
                outcome.missing_population.len(),
                outcome.missing_population.join(", ")
            ),
            MissingPopulationPolicy::Fail => {
                return Err(PipelineError::MissingPopulation {
                    regions: outcome.missing_population,
                });
            }
        }
    }

    if outcome.rows.is_empty() {
        if config.fail_on_empty {
            return Err(PipelineError::EmptyResult {
                stage: outcome.report.starved_at,
            });
        }
        log::warn!("No crime rows survived filtering, writing an empty table");
    }

    let display = ranked(&outcome.rows);
    log_table(&display);
    progress.inc(1);

    // ── Output ──────────────────────────────────────────────────────
    progress.set_message("Writing output".to_string());
    let output_path = config.output_path();
    let rows = match config.sort {
        OutputOrder::Region => &outcome.rows,
        OutputOrder::Rate => &display,
    };
    write_table_to_path(&output_path, SUMMARY_COLUMNS, rows)?;
    log::info!("Cleaned data saved to {}", output_path.display());
    progress.inc(1);

    Ok(PipelineReport {
        population_records: population_records.len(),
        population_regions: population.len(),
        crime: outcome.report,
        rows_written: rows.len(),
        missing_population: outcome.missing_population,
        zero_population: outcome.zero_population,
        output_path,
        duration: start.elapsed(),
    })
}

/// Logs the result table, one region per line.
fn log_table(rows: &[CrimeSummaryRow]) {
    log::info!("Crimes per 10,000 population:");
    log::info!("{:<24} {:>12} {:>12}", "state", "total_crimes", "per_10k");
    for row in rows {
        let rate = row
            .crimes_per_10k_population
            .map_or_else(|| "-".to_string(), |r| format!("{r:.2}"));
        log::info!("{:<24} {:>12} {:>12}", row.region, row.total_crimes, rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crime_rate_pipeline_models::progress::null_progress;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingProgress {
        steps: Mutex<u64>,
        finished: Mutex<Vec<String>>,
    }

    impl ProgressCallback for RecordingProgress {
        fn set_total(&self, _total: u64) {}

        fn inc(&self, delta: u64) {
            *self.steps.lock().unwrap() += delta;
        }

        fn set_message(&self, _msg: String) {}

        fn finish(&self, msg: String) {
            self.finished.lock().unwrap().push(msg);
        }
    }

    const POPULATION_CSV: &str = "state,sex,age,ethnicity,date,population
Selangor,both,overall,overall,2016-01-01,6
Selangor,male,overall,overall,2016-01-01,3.1
Johor,both,overall,overall,2016-01-01,3700
Johor,both,overall,overall,2015-01-01,3600
Malaysia,both,overall,overall,2016-01-01,31000
";

    const CRIME_CSV: &str = "state,district,category,type,date,crimes
Malaysia,All,assault,all,2016-01-01,9999
Selangor,All,assault,all,2016-03-01,500
Selangor,All,assault,murder,2016-03-01,20
Selangor,All,property,all,2016-06-01,1500
Selangor,Petaling,assault,all,2016-03-01,300
Selangor,All,assault,all,2017-01-01,700
Johor,All,property,all,2016-01-01,740
";

    fn write_inputs(dir: &Path, population: &str, crime: &str) -> PipelineConfig {
        std::fs::write(dir.join("population_state.csv"), population).unwrap();
        std::fs::write(dir.join("crime_district.csv"), crime).unwrap();
        PipelineConfig {
            data_dir: dir.to_path_buf(),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn writes_expected_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(dir.path(), POPULATION_CSV, CRIME_CSV);

        let report = run(&config, &null_progress()).unwrap();

        let output =
            std::fs::read_to_string(dir.path().join("crime_district_cleaned.csv")).unwrap();
        assert_eq!(
            output,
            "state,total_crimes,crimes_per_10k_population\n\
             Johor,740,2.0\n\
             Selangor,2000,3333.33\n"
        );
        assert_eq!(report.rows_written, 2);
        assert_eq!(report.population_regions, 3);
        assert!(report.missing_population.is_empty());
        assert_eq!(report.crime.input, 7);
        assert_eq!(report.crime.starved_at, None);
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(dir.path(), POPULATION_CSV, CRIME_CSV);
        let output = config.output_path();

        run(&config, &null_progress()).unwrap();
        let first = std::fs::read(&output).unwrap();
        run(&config, &null_progress()).unwrap();
        let second = std::fs::read(&output).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn rate_order_puts_highest_first() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            sort: OutputOrder::Rate,
            ..write_inputs(dir.path(), POPULATION_CSV, CRIME_CSV)
        };

        run(&config, &null_progress()).unwrap();

        let output = std::fs::read_to_string(config.output_path()).unwrap();
        let regions: Vec<&str> = output
            .lines()
            .skip(1)
            .filter_map(|line| line.split(',').next())
            .collect();
        assert_eq!(regions, vec!["Selangor", "Johor"]);
    }

    #[test]
    fn missing_population_is_written_without_rate() {
        let dir = tempfile::tempdir().unwrap();
        let crime = format!("{CRIME_CSV}Sabah,All,assault,all,2016-05-01,12\n");
        let config = write_inputs(dir.path(), POPULATION_CSV, &crime);

        let report = run(&config, &null_progress()).unwrap();

        assert_eq!(report.missing_population, vec!["Sabah".to_string()]);
        let output = std::fs::read_to_string(config.output_path()).unwrap();
        assert!(output.lines().any(|line| line == "Sabah,12,"));
    }

    #[test]
    fn missing_population_fails_under_fail_policy() {
        let dir = tempfile::tempdir().unwrap();
        let crime = format!("{CRIME_CSV}Sabah,All,assault,all,2016-05-01,12\n");
        let config = PipelineConfig {
            on_missing_population: MissingPopulationPolicy::Fail,
            ..write_inputs(dir.path(), POPULATION_CSV, &crime)
        };

        let err = run(&config, &null_progress()).unwrap_err();

        match err {
            PipelineError::MissingPopulation { regions } => {
                assert_eq!(regions, vec!["Sabah".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!config.output_path().exists());
    }

    #[test]
    fn starved_filters_write_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let crime = "state,district,category,type,date,crimes\n\
                     Johor,Muar,property,all,2016-01-01,5\n";
        let config = write_inputs(dir.path(), POPULATION_CSV, crime);

        let report = run(&config, &null_progress()).unwrap();

        assert_eq!(report.rows_written, 0);
        assert_eq!(report.crime.starved_at, Some(FilterStage::District));
        let output = std::fs::read_to_string(config.output_path()).unwrap();
        assert_eq!(output, "state,total_crimes,crimes_per_10k_population\n");
    }

    #[test]
    fn starved_filters_fail_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let crime = "state,district,category,type,date,crimes\n\
                     Johor,All,property,all,2013-01-01,5\n";
        let config = PipelineConfig {
            fail_on_empty: true,
            ..write_inputs(dir.path(), POPULATION_CSV, crime)
        };

        let err = run(&config, &null_progress()).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::EmptyResult {
                stage: Some(FilterStage::Year)
            }
        ));
    }

    #[test]
    fn missing_input_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("population_state.csv"), POPULATION_CSV).unwrap();
        let config = PipelineConfig {
            data_dir: dir.path().to_path_buf(),
            ..PipelineConfig::default()
        };

        let err = run(&config, &null_progress()).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Crime(CrimeError::Table(TableError::Io { .. }))
        ));
    }

    #[test]
    fn missing_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let crime = "state,district,category,date\nJohor,All,property,2016-01-01\n";
        let config = write_inputs(dir.path(), POPULATION_CSV, crime);

        let err = run(&config, &null_progress()).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Crime(CrimeError::Table(TableError::MissingColumn { .. }))
        ));
    }

    #[test]
    fn output_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            output_file: "out/nested/rates.csv".into(),
            ..write_inputs(dir.path(), POPULATION_CSV, CRIME_CSV)
        };

        let report = run(&config, &null_progress()).unwrap();

        assert!(report.output_path.ends_with("out/nested/rates.csv"));
        assert!(report.output_path.exists());
    }

    #[test]
    fn progress_finishes_after_every_step() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(dir.path(), POPULATION_CSV, CRIME_CSV);
        let recorder = Arc::new(RecordingProgress::default());
        let progress: Arc<dyn ProgressCallback> = recorder.clone();

        run(&config, &progress).unwrap();

        assert_eq!(*recorder.steps.lock().unwrap(), PIPELINE_STEPS);
        let finished = recorder.finished.lock().unwrap();
        assert_eq!(finished.len(), 1);
        assert!(finished[0].starts_with("2 regions written"));
    }

    #[test]
    fn progress_finishes_when_run_fails() {
        let dir = tempfile::tempdir().unwrap();
        let crime = format!("{CRIME_CSV}Sabah,All,assault,all,2016-05-01,12\n");
        let config = PipelineConfig {
            on_missing_population: MissingPopulationPolicy::Fail,
            ..write_inputs(dir.path(), POPULATION_CSV, &crime)
        };
        let recorder = Arc::new(RecordingProgress::default());
        let progress: Arc<dyn ProgressCallback> = recorder.clone();

        run(&config, &progress).unwrap_err();

        let finished = recorder.finished.lock().unwrap();
        assert_eq!(finished.len(), 1);
        assert!(finished[0].starts_with("Failed: No population for regions: Sabah"));
    }
}
