//! Tagged numeric values exchanged with the host.

use crate::kind::NumericKind;
use serde::{Deserialize, Serialize};

/// A single non-NULL argument value. SQL NULL is `Option::<Datum>::None`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Datum {
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Float4(f32),
    Float8(f64),
}

impl Datum {
    pub fn kind(&self) -> NumericKind {
        match self {
            Datum::Int2(_) => NumericKind::Int2,
            Datum::Int4(_) => NumericKind::Int4,
            Datum::Int8(_) => NumericKind::Int8,
            Datum::Float4(_) => NumericKind::Float4,
            Datum::Float8(_) => NumericKind::Float8,
        }
    }
}

impl From<i16> for Datum {
    fn from(v: i16) -> Self {
        Datum::Int2(v)
    }
}

impl From<i32> for Datum {
    fn from(v: i32) -> Self {
        Datum::Int4(v)
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Int8(v)
    }
}

impl From<f32> for Datum {
    fn from(v: f32) -> Self {
        Datum::Float4(v)
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Float8(v)
    }
}
