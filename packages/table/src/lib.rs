#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Headered CSV tables for the crime rate pipeline.
//!
//! Both input datasets and the output table are flat CSV files with a
//! header row. This crate reads them into `serde` row types after checking
//! that every required column is present, and writes result rows back out.
//! Date parsing shared by the population and crime loaders lives in
//! [`dates`].

pub mod dates;

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use dates::parse_date;

/// Errors that can occur while reading or writing a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The file could not be opened or created.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// CSV parsing or serialization failed.
    #[error("CSV error in {table}: {source}")]
    Csv {
        /// Label of the table being processed.
        table: String,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// A column the loader depends on is absent from the header row.
    #[error("{table} is missing required column '{column}'")]
    MissingColumn {
        /// Label of the table being processed.
        table: String,
        /// Name of the absent column.
        column: String,
    },

    /// A date cell could not be parsed as a calendar date.
    #[error("Invalid date '{value}'")]
    InvalidDate {
        /// The raw cell contents.
        value: String,
    },
}

/// Reads every row of a headered CSV into `T`.
///
/// Header names are trimmed before matching. Each entry in `required`
/// must appear in the header row, otherwise [`TableError::MissingColumn`]
/// is returned before any row is deserialized.
///
/// # Errors
///
/// Returns [`TableError::Csv`] if the header row or any data row is
/// malformed, and [`TableError::MissingColumn`] if a required column is
/// absent.
pub fn read_table<T, R>(reader: R, table: &str, required: &[&str]) -> Result<Vec<T>, TableError>
where
    T: DeserializeOwned,
    R: Read,
{
    let csv_err = |source: csv::Error| TableError::Csv {
        table: table.to_owned(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_err)?.clone();

    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(TableError::MissingColumn {
                table: table.to_owned(),
                column: (*column).to_owned(),
            });
        }
    }

    let rows = reader
        .deserialize::<T>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)?;

    log::debug!("Read {} rows from {table}", rows.len());

    Ok(rows)
}

/// Opens `path` and reads it with [`read_table`], labelling errors with
/// the file path.
///
/// # Errors
///
/// Returns [`TableError::Io`] if the file cannot be opened, or any error
/// produced by [`read_table`].
pub fn read_table_from_path<T>(path: &Path, required: &[&str]) -> Result<Vec<T>, TableError>
where
    T: DeserializeOwned,
{
    let file = File::open(path).map_err(|source| TableError::Io {
        path: path.display().to_string(),
        source,
    })?;

    read_table(file, &path.display().to_string(), required)
}

/// Writes `rows` as a CSV under the header row `columns`. The field order
/// of `T` must match `columns`. The header is written even when `rows` is
/// empty.
///
/// # Errors
///
/// Returns [`TableError::Csv`] if serialization or flushing fails.
pub fn write_table<T, W>(
    writer: W,
    table: &str,
    columns: &[&str],
    rows: &[T],
) -> Result<(), TableError>
where
    T: Serialize,
    W: Write,
{
    let csv_err = |source: csv::Error| TableError::Csv {
        table: table.to_owned(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(columns).map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| csv_err(e.into()))?;

    Ok(())
}

/// Writes `rows` to `path`, replacing any existing file. The parent
/// directory is created if it does not exist.
///
/// # Errors
///
/// Returns [`TableError::Io`] if the directory or file cannot be created,
/// or any error produced by [`write_table`].
pub fn write_table_to_path<T>(path: &Path, columns: &[&str], rows: &[T]) -> Result<(), TableError>
where
    T: Serialize,
{
    let io_err = |source: std::io::Error| TableError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(path).map_err(io_err)?;
    write_table(file, &path.display().to_string(), columns, rows)?;

    log::debug!("Wrote {} rows to {}", rows.len(), path.display());

    Ok(())
}
