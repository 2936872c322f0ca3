//! Reader for the per-device daily consumption table.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::{LoadError, find_column, parse_number};

/// Accepted headers for the per-device daily energy column (Wh).
pub const ENERGY_COLUMNS: &[&str] = &["ENERGIA (Wh)", "energy_wh"];

/// Reads a consumption CSV file and returns total daily consumption in kWh.
///
/// # Errors
///
/// Returns a `LoadError` if the file cannot be opened, the energy column is
/// missing, or a non-empty energy cell is not numeric.
pub fn read_consumption_csv(path: &Path) -> Result<f64, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    parse_consumption(file)
}

/// Sums the energy column of a consumption table and converts Wh to kWh.
///
/// Empty cells (e.g. subtotal or spacer rows) contribute nothing.
///
/// # Errors
///
/// See [`read_consumption_csv`].
pub fn parse_consumption(reader: impl Read) -> Result<f64, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let energy_idx = find_column(&headers, ENERGY_COLUMNS)?;

    let mut total_wh = 0.0_f64;
    let mut devices = 0_usize;
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let raw = record.get(energy_idx).unwrap_or("").trim();
        if raw.is_empty() {
            continue;
        }
        let wh = parse_number(raw).ok_or_else(|| LoadError::InvalidNumber {
            row: i + 2,
            column: headers[energy_idx].trim().to_string(),
            value: raw.to_string(),
        })?;
        total_wh += wh;
        devices += 1;
    }

    debug!(devices, total_wh, "consumption table loaded");
    Ok(total_wh / 1000.0)
}
