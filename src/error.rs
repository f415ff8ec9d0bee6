//! Error type shared by every summary-generation stage

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while building summary mappings, xrefs and exposure reports.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// `oed_fields` names a grouping that is not in the default catalog
    #[error("oed_fields value invalid: {0}")]
    InvalidGrouping(String),

    #[error("unable to process settings file: {0}")]
    MalformedSettings(String),

    #[error("column '{column}' not found in {table}")]
    MissingColumn { column: String, table: String },

    #[error("column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("column '{column}' holds invalid value '{value}'")]
    InvalidValue { column: String, value: String },

    /// A prerequisite file is absent or holds no rows
    #[error("{what} ({})", .path.display())]
    MissingTable { what: String, path: PathBuf },

    /// The right-hand side of a join holds the same key twice
    #[error("duplicate join key {key} in column '{column}'")]
    DuplicateJoinKey { column: String, key: String },

    #[error("reinsurance layer key '{0}' is not numeric")]
    InvalidLayerKey(String),

    #[error("no reinsurance layers defined")]
    NoReinsuranceLayers,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SummaryError {
    pub(crate) fn missing_column(column: impl Into<String>, table: impl Into<String>) -> Self {
        SummaryError::MissingColumn {
            column: column.into(),
            table: table.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SummaryError>;
