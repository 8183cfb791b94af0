//! Per-kind min/max scan and the `"<min>-><max>"` rendering.
//!
//! The scan runs once per group over a typed slice, so comparisons always use
//! the native ordering of the group's kind. Floats follow IEEE comparison: a
//! NaN never compares less or greater than anything, so it never replaces an
//! extreme, and a leading NaN is never replaced. Likewise `-0.0` and `0.0`
//! are equal, so the first of them seen is kept.

use crate::kind::NumericKind;
use crate::state::Column;
use std::fmt;

/// Running extremes of a non-empty sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extremes<T> {
    pub min: T,
    pub max: T,
}

impl<T: Copy + PartialOrd> Extremes<T> {
    pub fn new(first: T) -> Self {
        Self { min: first, max: first }
    }

    pub fn observe(&mut self, v: T) {
        if v < self.min {
            self.min = v;
        }
        if v > self.max {
            self.max = v;
        }
    }
}

/// Scan `values` in order, skipping NULLs. `None` if no value is present.
pub fn scan<T: Copy + PartialOrd>(values: &[Option<T>]) -> Option<Extremes<T>> {
    let mut acc: Option<Extremes<T>> = None;
    for &v in values.iter().flatten() {
        match acc.as_mut() {
            Some(e) => e.observe(v),
            None => acc = Some(Extremes::new(v)),
        }
    }
    acc
}

/// Textual form of a single value of its own kind.
pub trait SqlText: Copy {
    fn write_sql(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

macro_rules! int_sql_text {
    ($($t:ty),*) => {
        $(impl SqlText for $t {
            fn write_sql(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{self}")
            }
        })*
    };
}

int_sql_text!(i16, i32, i64);

impl SqlText for f32 {
    fn write_sql(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_float(f, *self, self.is_nan(), self.is_infinite(), 6)
    }
}

impl SqlText for f64 {
    fn write_sql(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_float(f, *self, self.is_nan(), self.is_infinite(), 15)
    }
}

/// Shortest round-trip decimal. Decimal exponents below -4 or at least
/// `max_plain_exp` switch to scientific notation with a signed, two-digit
/// exponent (`1e+20`, `1.5e-05`).
fn write_float<F>(
    f: &mut fmt::Formatter<'_>,
    v: F,
    nan: bool,
    infinite: bool,
    max_plain_exp: i32,
) -> fmt::Result
where
    F: fmt::Display + fmt::LowerExp + PartialOrd + Default,
{
    if nan {
        return f.write_str("NaN");
    }
    if infinite {
        return f.write_str(if v < F::default() { "-Infinity" } else { "Infinity" });
    }
    let sci = format!("{v:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return write!(f, "{v}");
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if exp < -4 || exp >= max_plain_exp {
        let sign = if exp < 0 { '-' } else { '+' };
        write!(f, "{mantissa}e{sign}{:02}", exp.unsigned_abs())
    } else {
        write!(f, "{v}")
    }
}

impl<T: SqlText> fmt::Display for Extremes<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.min.write_sql(f)?;
        f.write_str("->")?;
        self.max.write_sql(f)
    }
}

/// Extremes of a group, tagged with the group's kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MinMax {
    Int2(Extremes<i16>),
    Int4(Extremes<i32>),
    Int8(Extremes<i64>),
    Float4(Extremes<f32>),
    Float8(Extremes<f64>),
}

impl MinMax {
    /// Scan a column with the code path of its kind.
    pub fn of_column(column: &Column) -> Option<Self> {
        match column {
            Column::Int2(vals) => scan(vals).map(MinMax::Int2),
            Column::Int4(vals) => scan(vals).map(MinMax::Int4),
            Column::Int8(vals) => scan(vals).map(MinMax::Int8),
            Column::Float4(vals) => scan(vals).map(MinMax::Float4),
            Column::Float8(vals) => scan(vals).map(MinMax::Float8),
        }
    }

    pub fn kind(&self) -> NumericKind {
        match self {
            MinMax::Int2(_) => NumericKind::Int2,
            MinMax::Int4(_) => NumericKind::Int4,
            MinMax::Int8(_) => NumericKind::Int8,
            MinMax::Float4(_) => NumericKind::Float4,
            MinMax::Float8(_) => NumericKind::Float8,
        }
    }
}

impl fmt::Display for MinMax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinMax::Int2(e) => fmt::Display::fmt(e, f),
            MinMax::Int4(e) => fmt::Display::fmt(e, f),
            MinMax::Int8(e) => fmt::Display::fmt(e, f),
            MinMax::Float4(e) => fmt::Display::fmt(e, f),
            MinMax::Float8(e) => fmt::Display::fmt(e, f),
        }
    }
}
