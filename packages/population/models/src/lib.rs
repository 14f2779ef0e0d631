#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Population record, demographic slice, and lookup types.
//!
//! Population figures in the source dataset are expressed in thousands and
//! broken down by sex, age group, and ethnicity. The pipeline only ever
//! needs one total per region, selected by a [`DemographicSlice`] and a
//! reference year, which is what [`PopulationLookup`] holds.

use std::collections::BTreeMap;

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

/// Year the pipeline selects from both datasets unless configured
/// otherwise.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2016;

/// Source population values are in thousands.
pub const POPULATION_UNIT_MULTIPLIER: f64 = 1000.0;

/// Value of the age and ethnicity columns for the all-groups total.
pub const OVERALL: &str = "overall";

/// Sex breakdown of a population row.
///
/// Values outside the known set are preserved in [`Sex::Other`] so that
/// an unexpected breakdown never fails a load; such rows simply never
/// match the default slice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "lowercase")]
pub enum Sex {
    /// Male population.
    Male,
    /// Female population.
    Female,
    /// Both sexes combined.
    Both,
    /// Any other value found in the source.
    #[strum(default)]
    Other(String),
}

impl Sex {
    /// Returns the value as written in the source file.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Both => "both",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for Sex {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(Self::Other(value))
    }
}

impl From<Sex> for String {
    fn from(value: Sex) -> Self {
        value.as_str().to_owned()
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the population dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    /// State or territory name.
    pub region: String,
    /// Sex breakdown.
    pub sex: Sex,
    /// Age group label (`"overall"` for all ages).
    pub age_group: String,
    /// Ethnicity label (`"overall"` for all ethnicities).
    pub ethnicity: String,
    /// Reference date of the estimate.
    pub date: NaiveDate,
    /// Population in thousands. `None` when the source cell is blank.
    pub population: Option<f64>,
}

impl PopulationRecord {
    /// Calendar year of [`Self::date`].
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// The sex/age/ethnicity combination that selects one population total
/// per region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemographicSlice {
    /// Sex to select.
    pub sex: Sex,
    /// Age group to select.
    pub age_group: String,
    /// Ethnicity to select.
    pub ethnicity: String,
}

impl Default for DemographicSlice {
    fn default() -> Self {
        Self {
            sex: Sex::Both,
            age_group: OVERALL.to_owned(),
            ethnicity: OVERALL.to_owned(),
        }
    }
}

impl DemographicSlice {
    /// Returns whether `record` belongs to this slice (ignoring its date).
    #[must_use]
    pub fn matches(&self, record: &PopulationRecord) -> bool {
        record.sex == self.sex
            && record.age_group == self.age_group
            && record.ethnicity == self.ethnicity
    }
}

/// Absolute population per region for a single slice and year.
///
/// Iteration is in region order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PopulationLookup {
    populations: BTreeMap<String, f64>,
}

impl PopulationLookup {
    /// Creates an empty lookup.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            populations: BTreeMap::new(),
        }
    }

    /// Sets the population for `region`, returning the value it replaced.
    pub fn insert(&mut self, region: impl Into<String>, population: f64) -> Option<f64> {
        self.populations.insert(region.into(), population)
    }

    /// Returns the population for `region`, if present.
    #[must_use]
    pub fn get(&self, region: &str) -> Option<f64> {
        self.populations.get(region).copied()
    }

    /// Number of regions in the lookup.
    #[must_use]
    pub fn len(&self) -> usize {
        self.populations.len()
    }

    /// Returns `true` if no region has a population.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }

    /// Region names in sorted order.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.populations.keys().map(String::as_str)
    }
}

impl FromIterator<(String, f64)> for PopulationLookup {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            populations: iter.into_iter().collect(),
        }
    }
}
