//! The per-group accumulated collection.
//!
//! A [`MinMaxState`] is created by the first `step` call of a group and grows
//! by exactly one entry per call. Entries are stored in a [`Column`], one
//! strongly typed vector per [`NumericKind`], so a group can never hold values
//! of two kinds at once.
//!
//! States are plain owned values: the host moves them from one call to the
//! next and drops them after `finalize`. With the `spilling` feature a state
//! can also be encoded to bytes and decoded again, e.g. to ship a partial
//! state between workers.

use crate::array::ArrayValue;
use crate::datum::Datum;
use crate::error::{AggError, AggResult};
use crate::kind::NumericKind;
use serde::{Deserialize, Serialize};

/// Homogeneous, NULL-aware column of values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Column {
    Int2(Vec<Option<i16>>),
    Int4(Vec<Option<i32>>),
    Int8(Vec<Option<i64>>),
    Float4(Vec<Option<f32>>),
    Float8(Vec<Option<f64>>),
}

/// Run `$body` against the inner vector of any column variant.
macro_rules! on_column {
    ($col:expr, $vals:ident => $body:expr) => {
        match $col {
            Column::Int2($vals) => $body,
            Column::Int4($vals) => $body,
            Column::Int8($vals) => $body,
            Column::Float4($vals) => $body,
            Column::Float8($vals) => $body,
        }
    };
}

impl Column {
    pub fn empty(kind: NumericKind) -> Self {
        match kind {
            NumericKind::Int2 => Column::Int2(Vec::new()),
            NumericKind::Int4 => Column::Int4(Vec::new()),
            NumericKind::Int8 => Column::Int8(Vec::new()),
            NumericKind::Float4 => Column::Float4(Vec::new()),
            NumericKind::Float8 => Column::Float8(Vec::new()),
        }
    }

    pub fn kind(&self) -> NumericKind {
        match self {
            Column::Int2(_) => NumericKind::Int2,
            Column::Int4(_) => NumericKind::Int4,
            Column::Int8(_) => NumericKind::Int8,
            Column::Float4(_) => NumericKind::Float4,
            Column::Float8(_) => NumericKind::Float8,
        }
    }

    pub fn len(&self) -> usize {
        on_column!(self, vals => vals.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of NULL entries.
    pub fn null_count(&self) -> usize {
        on_column!(self, vals => vals.iter().filter(|v| v.is_none()).count())
    }

    /// Entry at `idx`: `None` when out of bounds, `Some(None)` for a NULL.
    pub fn get(&self, idx: usize) -> Option<Option<Datum>> {
        on_column!(self, vals => vals.get(idx).map(|v| v.map(Datum::from)))
    }

    /// Append one entry. A present value must match the column's kind.
    pub fn push(&mut self, value: Option<Datum>) -> AggResult<()> {
        let Some(datum) = value else {
            on_column!(self, vals => vals.push(None));
            return Ok(());
        };
        match (self, datum) {
            (Column::Int2(vals), Datum::Int2(v)) => vals.push(Some(v)),
            (Column::Int4(vals), Datum::Int4(v)) => vals.push(Some(v)),
            (Column::Int8(vals), Datum::Int8(v)) => vals.push(Some(v)),
            (Column::Float4(vals), Datum::Float4(v)) => vals.push(Some(v)),
            (Column::Float8(vals), Datum::Float8(v)) => vals.push(Some(v)),
            (col, datum) => return Err(AggError::kind_mismatch(col.kind(), datum.kind())),
        }
        Ok(())
    }

    /// Move every entry of `other` to the end of `self`, keeping order.
    pub fn append(&mut self, other: Column) -> AggResult<()> {
        match (self, other) {
            (Column::Int2(a), Column::Int2(b)) => a.extend(b),
            (Column::Int4(a), Column::Int4(b)) => a.extend(b),
            (Column::Int8(a), Column::Int8(b)) => a.extend(b),
            (Column::Float4(a), Column::Float4(b)) => a.extend(b),
            (Column::Float8(a), Column::Float8(b)) => a.extend(b),
            (a, b) => return Err(AggError::kind_mismatch(a.kind(), b.kind())),
        }
        Ok(())
    }
}

/// Accumulated state of one group: an append-only column tagged with the
/// group's kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxState {
    column: Column,
}

impl MinMaxState {
    /// An empty collection for `kind`.
    pub fn new(kind: NumericKind) -> Self {
        Self {
            column: Column::empty(kind),
        }
    }

    pub fn kind(&self) -> NumericKind {
        self.column.kind()
    }

    pub fn len(&self) -> usize {
        self.column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.column.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.column.null_count()
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub(crate) fn push(&mut self, value: Option<Datum>) -> AggResult<()> {
        self.column.push(value)
    }

    pub(crate) fn append(&mut self, other: MinMaxState) -> AggResult<()> {
        self.column.append(other.column)
    }

    /// Materialize the collection as a one-dimensional array.
    pub fn into_array(self) -> ArrayValue {
        ArrayValue::one_dimensional(self.column)
    }

    /// Encode the state for transfer between workers.
    #[cfg(feature = "spilling")]
    pub fn to_bytes(&self) -> AggResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|e| AggError::InvalidState {
            reason: format!("encode: {e}"),
        })
    }

    /// Decode a state produced by [`MinMaxState::to_bytes`].
    #[cfg(feature = "spilling")]
    pub fn from_bytes(bytes: &[u8]) -> AggResult<Self> {
        postcard::from_bytes(bytes).map_err(|e| AggError::InvalidState {
            reason: format!("decode: {e}"),
        })
    }
}
