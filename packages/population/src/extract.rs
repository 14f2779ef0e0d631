//! Reduction of population records to one total per region.

use crime_rate_population_models::{
    DemographicSlice, POPULATION_UNIT_MULTIPLIER, PopulationLookup, PopulationRecord,
};

/// Builds the region → absolute population lookup for `slice` in `year`.
///
/// Records outside the slice or year are ignored. Surviving values are
/// converted from thousands to an absolute count. When two surviving
/// records share a region, the later one wins. A surviving record with a
/// blank population is skipped, leaving its region absent.
#[must_use]
pub fn extract_population(
    records: &[PopulationRecord],
    slice: &DemographicSlice,
    year: i32,
) -> PopulationLookup {
    let matched: Vec<&PopulationRecord> = records
        .iter()
        .filter(|r| slice.matches(r) && r.year() == year)
        .collect();

    log::info!(
        "Population data found for {} records in {year} ({} sex, {} age, {} ethnicity)",
        matched.len(),
        slice.sex,
        slice.age_group,
        slice.ethnicity,
    );

    let mut lookup = PopulationLookup::new();

    for record in matched {
        let Some(thousands) = record.population else {
            log::warn!(
                "{}: population is blank for {}, region left without population",
                record.region,
                record.date,
            );
            continue;
        };

        let absolute = thousands * POPULATION_UNIT_MULTIPLIER;
        if let Some(previous) = lookup.insert(record.region.clone(), absolute) {
            log::debug!(
                "{}: duplicate population row, replacing {previous} with {absolute}",
                record.region,
            );
        }
    }

    log::info!(
        "Regions found: {}",
        lookup.regions().collect::<Vec<_>>().join(", ")
    );

    lookup
}
