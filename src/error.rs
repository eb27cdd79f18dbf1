// Dashboard errors - everything that can stop the store from coming up
// or an export from being written

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationIssue;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("data file {path} contains no records")]
    EmptyDataset { path: PathBuf },

    #[error("{count} records break total invariants (first: {first})")]
    InvariantViolation { count: usize, first: ValidationIssue },

    #[error("column {column} sums past {max}", max = u64::MAX)]
    TotalOverflow { column: &'static str },

    #[error("csv export failed: {0}")]
    Export(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
