#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime record, filter, and per-region summary types.
//!
//! The crime dataset reports counts per region, district, offense
//! category, offense type, and date. Aggregate rows are marked with
//! sentinel values: district `"All"` totals every district of a region,
//! and type `"all"` totals every offense type within a category.

use std::cmp::Ordering;

use chrono::{Datelike as _, NaiveDate};
use crime_rate_population_models::DEFAULT_REFERENCE_YEAR;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// District value of region-level aggregate rows.
pub const AGGREGATE_DISTRICT: &str = "All";

/// Offense type value of category-level aggregate rows.
pub const AGGREGATE_TYPE: &str = "all";

/// Region value of the national rollup rows.
pub const NATIONAL_REGION: &str = "Malaysia";

/// Population denominator of the normalized rate.
pub const RATE_PER_POPULATION: f64 = 10_000.0;

/// Decimal places the normalized rate is rounded to.
pub const RATE_DECIMALS: i32 = 2;

/// One row of the crime dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrimeRecord {
    /// State or territory name.
    pub region: String,
    /// District name, or `"All"` for the region total.
    pub district: String,
    /// Offense family (e.g. `"assault"`, `"property"`).
    pub category: String,
    /// Offense type within the category, or `"all"` for the category
    /// total. `None` when the source has no type column.
    pub crime_type: Option<String>,
    /// Reporting date.
    pub date: NaiveDate,
    /// Number of recorded crimes.
    pub crimes: u64,
}

impl CrimeRecord {
    /// Calendar year of [`Self::date`].
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// Parameters of the structural filters and category selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrimeFilter {
    /// Regions dropped before any other stage (national rollups).
    pub excluded_regions: Vec<String>,
    /// District value identifying region-level rows.
    pub aggregate_district: String,
    /// Offense type value identifying category-level rows.
    pub aggregate_type: String,
    /// Year to keep.
    pub year: i32,
    /// Categories summed into each region's total.
    pub categories: Vec<String>,
}

impl Default for CrimeFilter {
    fn default() -> Self {
        Self {
            excluded_regions: vec![NATIONAL_REGION.to_owned()],
            aggregate_district: AGGREGATE_DISTRICT.to_owned(),
            aggregate_type: AGGREGATE_TYPE.to_owned(),
            year: DEFAULT_REFERENCE_YEAR,
            categories: vec!["assault".to_owned(), "property".to_owned()],
        }
    }
}

/// Filter stages applied to the crime records, in order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilterStage {
    /// Excluded regions removed.
    Region,
    /// Only region-level district rows kept.
    District,
    /// Only category-level offense type rows kept.
    CrimeType,
    /// Only the reference year kept.
    Year,
    /// Only the selected categories kept.
    Category,
}

impl FilterStage {
    /// Returns all stages in application order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Region,
            Self::District,
            Self::CrimeType,
            Self::Year,
            Self::Category,
        ]
    }

    /// Human-readable description used in stage logs.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Region => "removing excluded regions",
            Self::District => "keeping only region-level districts",
            Self::CrimeType => "keeping only aggregate offense types",
            Self::Year => "keeping only the reference year",
            Self::Category => "keeping only selected categories",
        }
    }
}

/// Row counts observed while filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    /// Records before any filter.
    pub input: usize,
    /// `(stage, rows remaining)` in application order.
    pub stages: Vec<(FilterStage, usize)>,
    /// Distinct categories present after the year filter, sorted.
    pub categories_observed: Vec<String>,
    /// First stage that removed every remaining row, if any.
    pub starved_at: Option<FilterStage>,
}

impl FilterReport {
    /// Rows remaining after `stage`, if it ran.
    #[must_use]
    pub fn remaining_after(&self, stage: FilterStage) -> Option<usize> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, count)| *count)
    }
}

/// Header of the output table, in [`CrimeSummaryRow`] field order.
pub const SUMMARY_COLUMNS: &[&str] = &["state", "total_crimes", "crimes_per_10k_population"];

/// One output row: a region's crime total and normalized rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimeSummaryRow {
    /// State or territory name.
    #[serde(rename = "state")]
    pub region: String,
    /// Sum of crimes over the selected categories.
    pub total_crimes: u64,
    /// Joined absolute population, if the region had one.
    #[serde(skip)]
    pub population: Option<f64>,
    /// Crimes per 10,000 residents rounded to two decimals. `None` when
    /// the population is missing or zero.
    pub crimes_per_10k_population: Option<f64>,
}

impl CrimeSummaryRow {
    /// Builds a row, computing the normalized rate from `population`.
    #[must_use]
    pub fn new(region: String, total_crimes: u64, population: Option<f64>) -> Self {
        Self {
            crimes_per_10k_population: population.and_then(|p| crimes_per_10k(total_crimes, p)),
            region,
            total_crimes,
            population,
        }
    }
}

/// Result of aggregating the crime records against a population lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationOutcome {
    /// One row per region, in region order.
    pub rows: Vec<CrimeSummaryRow>,
    /// Regions with crimes but no population entry.
    pub missing_population: Vec<String>,
    /// Regions whose population entry is zero.
    pub zero_population: Vec<String>,
    /// Filter stage counts.
    pub report: FilterReport,
}

/// Crimes per 10,000 residents, rounded to [`RATE_DECIMALS`] places.
///
/// Returns `None` when `population` is zero or the result is not finite.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn crimes_per_10k(total_crimes: u64, population: f64) -> Option<f64> {
    if population == 0.0 {
        return None;
    }
    let rate = round_to(total_crimes as f64 / population * RATE_PER_POPULATION, RATE_DECIMALS);
    rate.is_finite().then_some(rate)
}

/// Rounds `value` to `decimals` places, ties to even.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Sorts rows by rate descending. Rows without a rate go last; ties are
/// broken by region name.
#[must_use]
pub fn ranked(rows: &[CrimeSummaryRow]) -> Vec<CrimeSummaryRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        match (a.crimes_per_10k_population, b.crimes_per_10k_population) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| a.region.cmp(&b.region))
    });
    sorted
}
