//! Error type shared by the loader, scale builder and chart session.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that stops a chart from being drawn.
///
/// Load failures are terminal: the caller gets one of these and nothing is rendered.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetching {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("first column must be \"Country\", found {found:?}")]
    MissingCountryColumn { found: String },

    #[error("table has no year columns")]
    NoYearColumns,

    #[error("column header {header:?} is not a four-digit year")]
    InvalidYear { header: String },

    #[error("year column {header:?} appears more than once")]
    DuplicateYear { header: String },

    #[error("row {row} has an empty country name")]
    EmptyCountryName { row: usize },

    #[error("country {0:?} appears more than once")]
    DuplicateCountry(String),

    #[error("table has no data rows")]
    NoRows,

    #[error("table has no numeric values")]
    NoNumericValues,

    #[error("values from {lo:e} to {hi:e} span more than a float can hold")]
    ValueRangeOverflow { lo: f64, hi: f64 },

    #[error("invalid palette color {0:?}, expected #rrggbb")]
    InvalidColor(String),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;
