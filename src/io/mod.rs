//! CSV ingestion of engine inputs and export of engine outputs.

pub mod consumption;
pub mod export;
pub mod generation;

use thiserror::Error;

/// Failure to load an input table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open \"{path}\": {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// None of the accepted header names is present.
    #[error("missing column: expected one of {expected:?}")]
    MissingColumn { expected: &'static [&'static str] },

    /// A required numeric cell could not be parsed.
    #[error("row {row}: invalid number \"{value}\" in column \"{column}\"")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

/// Index of the first header matching one of `names` (trimmed, case-insensitive).
fn find_column(
    headers: &csv::StringRecord,
    names: &'static [&'static str],
) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        .ok_or(LoadError::MissingColumn { expected: names })
}

/// Parses a finite numeric cell, accepting a decimal comma.
fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .or_else(|| trimmed.replace(',', ".").parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
