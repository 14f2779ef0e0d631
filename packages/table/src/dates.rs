//! Calendar date parsing for table cells.
//!
//! Source files carry dates either as plain `YYYY-MM-DD` or as full
//! timestamps; only the calendar date matters to the pipeline.

use chrono::{NaiveDate, NaiveDateTime};

use crate::TableError;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parses a date cell into a [`NaiveDate`], discarding any time component.
///
/// # Errors
///
/// Returns [`TableError::InvalidDate`] if the value matches none of the
/// supported formats.
pub fn parse_date(value: &str) -> Result<NaiveDate, TableError> {
    let trimmed = value.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(datetime.date());
        }
    }

    Err(TableError::InvalidDate {
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike as _;

    #[test]
    fn parses_plain_date() {
        let date = parse_date("2016-01-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2016, 1, 1).unwrap());
    }

    #[test]
    fn parses_timestamp_and_keeps_date() {
        let date = parse_date("2016-06-30 13:45:00").unwrap();
        assert_eq!(date.year(), 2016);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 30);
    }

    #[test]
    fn parses_iso_timestamp_with_fraction() {
        let date = parse_date("2017-02-03T00:00:00.000").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2017, 2, 3).unwrap());
    }

    #[test]
    fn parses_slash_date_with_whitespace() {
        let date = parse_date(" 2016/12/31 ").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2016, 12, 31).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_date("sometime in 2016"),
            Err(TableError::InvalidDate { .. })
        ));
    }
}
