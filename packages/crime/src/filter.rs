//! Structural filter stages over the crime records.

use std::collections::BTreeSet;

use crime_rate_crime_models::{CrimeFilter, CrimeRecord, FilterReport, FilterStage};

fn keeps(filter: &CrimeFilter, stage: FilterStage, record: &CrimeRecord) -> bool {
    match stage {
        FilterStage::Region => !filter.excluded_regions.contains(&record.region),
        FilterStage::District => record.district == filter.aggregate_district,
        // Files without a type column carry only category totals.
        FilterStage::CrimeType => record
            .crime_type
            .as_ref()
            .is_none_or(|t| *t == filter.aggregate_type),
        FilterStage::Year => record.year() == filter.year,
        FilterStage::Category => filter.categories.contains(&record.category),
    }
}

/// Narrows `records` through every [`FilterStage`] in order.
///
/// Returns the surviving records together with the row count after each
/// stage. The categories seen after the year stage are recorded before
/// the category selection runs. The first stage to empty a non-empty
/// working set is recorded as [`FilterReport::starved_at`].
#[must_use]
pub fn apply_filters<'a>(
    records: &'a [CrimeRecord],
    filter: &CrimeFilter,
) -> (Vec<&'a CrimeRecord>, FilterReport) {
    let mut report = FilterReport {
        input: records.len(),
        ..FilterReport::default()
    };

    log::info!("Input crime data: {} rows", records.len());

    let mut working: Vec<&CrimeRecord> = records.iter().collect();

    for &stage in FilterStage::all() {
        if stage == FilterStage::Category {
            let observed: BTreeSet<&str> = working.iter().map(|r| r.category.as_str()).collect();
            report.categories_observed = observed.into_iter().map(str::to_owned).collect();
            log::info!(
                "Available categories: {}",
                report.categories_observed.join(", ")
            );
        }

        let before = working.len();
        working.retain(|r| keeps(filter, stage, r));
        let after = working.len();

        log::info!("After {}: {after} rows", stage.description());
        report.stages.push((stage, after));

        if before > 0 && after == 0 && report.starved_at.is_none() {
            log::warn!("Filter stage '{stage}' removed all remaining crime rows");
            report.starved_at = Some(stage);
        }
    }

    (working, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(region: &str, district: &str, category: &str, year: i32, crimes: u64) -> CrimeRecord {
        CrimeRecord {
            region: region.to_string(),
            district: district.to_string(),
            category: category.to_string(),
            crime_type: Some("all".to_string()),
            date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            crimes,
        }
    }

    #[test]
    fn drops_national_rollup() {
        let records = vec![
            record("Malaysia", "All", "assault", 2016, 100),
            record("Johor", "All", "assault", 2016, 10),
        ];
        let (kept, report) = apply_filters(&records, &CrimeFilter::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].region, "Johor");
        assert_eq!(report.remaining_after(FilterStage::Region), Some(1));
    }

    #[test]
    fn drops_district_breakdowns() {
        let records = vec![
            record("Selangor", "Petaling", "assault", 2016, 50),
            record("Selangor", "All", "assault", 2016, 80),
        ];
        let (kept, _) = apply_filters(&records, &CrimeFilter::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].district, "All");
    }

    #[test]
    fn drops_offense_type_breakdowns_but_keeps_untyped_rows() {
        let mut typed = record("Perak", "All", "property", 2016, 5);
        typed.crime_type = Some("break_in".to_string());
        let mut untyped = record("Perak", "All", "property", 2016, 7);
        untyped.crime_type = None;
        let records = vec![typed, untyped, record("Perak", "All", "assault", 2016, 3)];

        let (kept, report) = apply_filters(&records, &CrimeFilter::default());
        let crimes: Vec<u64> = kept.iter().map(|r| r.crimes).collect();
        assert_eq!(crimes, vec![7, 3]);
        assert_eq!(report.remaining_after(FilterStage::CrimeType), Some(2));
    }

    #[test]
    fn keeps_only_reference_year_and_selected_categories() {
        let records = vec![
            record("Kedah", "All", "assault", 2015, 1),
            record("Kedah", "All", "assault", 2016, 2),
            record("Kedah", "All", "property", 2016, 3),
            record("Kedah", "All", "all", 2016, 5),
        ];
        let (kept, report) = apply_filters(&records, &CrimeFilter::default());
        assert_eq!(kept.len(), 2);
        assert_eq!(report.categories_observed, vec!["all", "assault", "property"]);
        assert_eq!(report.remaining_after(FilterStage::Year), Some(3));
        assert_eq!(report.remaining_after(FilterStage::Category), Some(2));
        assert_eq!(report.starved_at, None);
    }

    #[test]
    fn records_first_starving_stage() {
        let records = vec![record("Johor", "Muar", "assault", 2016, 4)];
        let (kept, report) = apply_filters(&records, &CrimeFilter::default());
        assert!(kept.is_empty());
        assert_eq!(report.starved_at, Some(FilterStage::District));
        assert_eq!(report.stages.len(), FilterStage::all().len());
    }

    #[test]
    fn empty_input_is_not_starvation() {
        let (kept, report) = apply_filters(&[], &CrimeFilter::default());
        assert!(kept.is_empty());
        assert_eq!(report.input, 0);
        assert_eq!(report.starved_at, None);
    }
}
