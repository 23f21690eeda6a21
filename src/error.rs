//! Error types for the analytics pipeline

use thiserror::Error;

/// Errors surfaced by dataset loading and the analytic computations.
///
/// Row-level problems (an unparseable timestamp, a missing field) are filtered
/// out by the individual analytics and never reach the caller; only structural
/// problems and fully-empty results are reported.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// A timestamp field could not be parsed. Rows carrying such values are
    /// excluded from time-based aggregations.
    #[error("unparseable timestamp: '{0}'")]
    Timestamp(String),

    /// A required input column is absent from the dataset.
    #[error("required column '{0}' is missing from the dataset")]
    MissingColumn(String),

    /// The dataset contains no rows at all.
    #[error("dataset contains no rows")]
    EmptyDataset,

    /// Filtering left zero valid rows for the named analytic.
    #[error("no valid rows remain for {analytic}")]
    EmptyResult { analytic: &'static str },
}
