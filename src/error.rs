//! Error type for certificate construction and queries.
use thiserror::Error;

/// Failures surfaced by the tabular certificates.
///
/// Every variant is a precondition violation or an invalid input; none of
/// them is recovered from internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CbfError {
    /// A query was made before any table was assigned.
    #[error("table has not been populated; assign a value table before querying")]
    Unpopulated,

    /// `tabularize` was handed a certificate built on different dynamics.
    #[error("certificate dynamics do not match the configured dynamics")]
    DynamicsMismatch,

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(&'static str),

    /// A query state that cannot be clipped, such as one with a NaN coordinate.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// Failure inside the grid's interpolation or differentiation.
    #[error("grid operation failed: {0}")]
    Grid(&'static str),

    /// Failure inside the time interpolation, including out-of-range queries
    /// under a strict extrapolation policy.
    #[error("time interpolation failed: {0}")]
    Time(&'static str),

    /// Failure reported by an exact certificate during tabularization.
    #[error("certificate evaluation failed: {0}")]
    Certificate(String),
}
