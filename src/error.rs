use std::time::Duration;

use thiserror::Error;

/// Conditions that stop a generator or dataset from being built.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("table data for year {year} not ready after {waited:?}")]
    DataNotReady { year: i32, waited: Duration },
    #[error("malformed table data: {0}")]
    MalformedData(String),
    #[error("malformed table snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a draw produced nothing. Never surfaced as an error to callers of the
/// generate operations; they see `None` or a short `Vec`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoResult {
    #[error("unknown faction")]
    UnknownFaction,
    #[error("no table matches the requested filters")]
    NoMatchingTable,
    #[error("no table entry passes the filter")]
    EmptyTableAfterFilter,
}
