//! Materialized arrays handed to the finalizer.
//!
//! A state always materializes as a one-dimensional array. Hosts that build
//! the array themselves go through [`ArrayValue::from_datums`], which checks
//! the element type and the dimension list before any value is looked at.

use crate::datum::Datum;
use crate::error::{AggError, AggResult};
use crate::kind::{NumericKind, SqlType};
use crate::state::Column;

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayValue {
    dims: Vec<usize>,
    column: Column,
}

impl ArrayValue {
    pub(crate) fn one_dimensional(column: Column) -> Self {
        Self {
            dims: vec![column.len()],
            column,
        }
    }

    /// Build an array from host-supplied parts.
    ///
    /// Fails with [`AggError::UnsupportedType`] (or `InvalidInputKind` for an
    /// unresolved type) when `elem_type` is not numeric, and with
    /// [`AggError::InvalidState`] when `dims` does not describe `values`.
    pub fn from_datums(
        elem_type: &SqlType,
        dims: Vec<usize>,
        values: Vec<Option<Datum>>,
    ) -> AggResult<Self> {
        let kind = NumericKind::try_from(elem_type)?;
        let expected: usize = if dims.is_empty() { 0 } else { dims.iter().product() };
        if expected != values.len() {
            return Err(AggError::InvalidState {
                reason: format!("dimensions {dims:?} describe {expected} elements, got {}", values.len()),
            });
        }
        let mut column = Column::empty(kind);
        for v in values {
            column.push(v)?;
        }
        Ok(Self { dims, column })
    }

    /// Number of dimensions; an empty array has none.
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn kind(&self) -> NumericKind {
        self.column.kind()
    }

    pub fn column(&self) -> &Column {
        &self.column
    }
}
