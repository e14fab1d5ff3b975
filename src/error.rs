// Error types for loading, configuration and chart rendering
//
// Loading errors are fatal for the process. Render errors only take down the
// chart group that raised them.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("line {line}: invalid date {value:?} in column dteday")]
    InvalidDate { line: usize, value: String },

    #[error("line {line}: invalid value {value:?} in column {column}")]
    InvalidField {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("duplicate record for date {0}")]
    DuplicateDate(chrono::NaiveDate),

    #[error("dataset contains no rows")]
    Empty,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    /// Quartile edges collapsed because the customers have too few distinct values
    #[error("cannot split {measure} into quartiles: only {distinct} distinct value(s)")]
    QuartileBinning { measure: &'static str, distinct: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("histogram_bins must be at least 1")]
    InvalidBins,
}
