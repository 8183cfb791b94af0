//! Errors raised by the aggregate entry points.
//!
//! Every variant is fatal for the group being reduced: the host is expected to
//! abort the query rather than emit a partial result. Empty and all-NULL
//! groups are not errors; they finalize to `None`.

use crate::kind::{NumericKind, SqlType, SUPPORTED_TYPES};
use std::fmt;

/// Result alias for the aggregate core.
pub type AggResult<T> = Result<T, AggError>;

#[derive(Debug, Clone, PartialEq)]
pub enum AggError {
    /// An entry point was invoked outside an aggregate calling sequence.
    InvalidContext { function: &'static str },
    /// The argument kind could not be resolved, or a value contradicts the
    /// kind already fixed for the group.
    InvalidInputKind { detail: String },
    /// The materialized collection has more than one dimension.
    MultiDimensional { ndim: usize },
    /// The declared element type is not one of the five numeric kinds.
    UnsupportedType { found: SqlType },
    /// A serialized or host-built state is malformed.
    InvalidState { reason: String },
}

impl AggError {
    pub(crate) fn kind_mismatch(expected: NumericKind, found: NumericKind) -> Self {
        AggError::InvalidInputKind {
            detail: format!("expected a {expected} value, got {found}"),
        }
    }
}

impl fmt::Display for AggError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggError::InvalidContext { function } => {
                write!(f, "{function} called in non-aggregate context")
            }
            AggError::InvalidInputKind { detail } => {
                write!(f, "invalid input kind: {detail}")
            }
            AggError::MultiDimensional { ndim } => {
                write!(f, "not received one dimensional array (got {ndim} dimensions)")
            }
            AggError::UnsupportedType { found } => {
                write!(f, "unsupported data type {found}: supported data types are {SUPPORTED_TYPES}")
            }
            AggError::InvalidState { reason } => write!(f, "invalid aggregate state: {reason}"),
        }
    }
}

impl std::error::Error for AggError {}
