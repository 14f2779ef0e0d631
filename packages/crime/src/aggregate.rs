//! Per-region aggregation, population join, and rate normalization.

use std::collections::BTreeMap;

use crime_rate_crime_models::{AggregationOutcome, CrimeFilter, CrimeRecord, CrimeSummaryRow};
use crime_rate_population_models::PopulationLookup;

use crate::filter::apply_filters;

/// Filters `records`, sums the selected categories per region, and joins
/// each total with `population` to compute crimes per 10,000 residents.
///
/// Rows come back in region order. A region without a population entry
/// still produces a row, with no rate, and is listed in
/// [`AggregationOutcome::missing_population`]; likewise a zero population
/// is listed in [`AggregationOutcome::zero_population`].
#[must_use]
pub fn aggregate_crime(
    records: &[CrimeRecord],
    population: &PopulationLookup,
    filter: &CrimeFilter,
) -> AggregationOutcome {
    let (selected, report) = apply_filters(records, filter);

    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for record in selected {
        *totals.entry(record.region.as_str()).or_default() += record.crimes;
    }

    let mut missing_population = Vec::new();
    let mut zero_population = Vec::new();

    let rows: Vec<CrimeSummaryRow> = totals
        .into_iter()
        .map(|(region, total)| {
            let joined = population.get(region);
            match joined {
                None => {
                    log::warn!("{region}: no population entry, rate left empty");
                    missing_population.push(region.to_owned());
                }
                Some(p) if p == 0.0 => {
                    log::warn!("{region}: population is zero, rate left empty");
                    zero_population.push(region.to_owned());
                }
                Some(_) => {}
            }
            CrimeSummaryRow::new(region.to_owned(), total, joined)
        })
        .collect();

    log::info!("Final cleaned data: {} regions", rows.len());

    AggregationOutcome {
        rows,
        missing_population,
        zero_population,
        report,
    }
}
