//! Reader for the daily generation table of a 1 kW reference panel.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use super::{LoadError, find_column, parse_number};
use crate::sim::types::{GenerationSample, GenerationSeries};

/// Accepted headers for the date column.
pub const DATE_COLUMNS: &[&str] = &["fecha", "date"];
/// Accepted headers for the 1 kW generation column.
pub const ENERGY_COLUMNS: &[&str] = &["ENERGIA GENERADA POR UN PANEL DE 1kWh", "energy_1kw_kwh"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Reads a generation CSV file into a sorted, date-unique series.
///
/// # Errors
///
/// Returns a `LoadError` if the file cannot be opened, a column is missing,
/// or an energy value is not numeric.
pub fn read_generation_csv(path: &Path) -> Result<GenerationSeries, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    parse_generation(file)
}

/// Parses generation CSV from any reader.
///
/// Rows whose date cannot be parsed are dropped with a warning; the rest
/// are sorted and deduplicated by date.
///
/// # Errors
///
/// See [`read_generation_csv`].
pub fn parse_generation(reader: impl Read) -> Result<GenerationSeries, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let date_idx = find_column(&headers, DATE_COLUMNS)?;
    let energy_idx = find_column(&headers, ENERGY_COLUMNS)?;

    let mut samples = Vec::new();
    let mut dropped = 0_usize;
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // header is line 1
        let row = i + 2;
        let raw_date = record.get(date_idx).unwrap_or("");
        let Some(date) = parse_date(raw_date) else {
            warn!(row, value = raw_date, "dropping row with unparsable date");
            dropped += 1;
            continue;
        };
        let raw_energy = record.get(energy_idx).unwrap_or("");
        let energy_1kw_kwh = parse_number(raw_energy).ok_or_else(|| LoadError::InvalidNumber {
            row,
            column: headers[energy_idx].trim().to_string(),
            value: raw_energy.to_string(),
        })?;
        samples.push(GenerationSample::new(date, energy_1kw_kwh));
    }

    let series = GenerationSeries::new(samples);
    debug!(days = series.len(), dropped, "generation table loaded");
    Ok(series)
}

/// Parses a date cell in any of the accepted formats; time of day is ignored.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}
