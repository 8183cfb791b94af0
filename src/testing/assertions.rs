//! Assertions and reference computations for aggregate results.

use crate::datum::Datum;
use crate::extremes::{Extremes, MinMax};
use ordered_float::OrderedFloat;

/// Assert a `min_to_max` result, with both sides in the panic message.
///
/// # Panics
///
/// Panics if `actual` differs from `expected`.
///
/// ```
/// use min_to_max::testing::assert_result;
///
/// assert_result(&Some("1->2".to_string()), Some("1->2"));
/// assert_result(&None, None);
/// ```
pub fn assert_result(actual: &Option<String>, expected: Option<&str>) {
    assert_eq!(
        actual.as_deref(),
        expected,
        "min_to_max mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
}

/// Compute the expected result independently of the scan under test, by
/// taking the total-order minimum and maximum of the present values.
///
/// Only meaningful for NaN-free input. Panics if the rows mix kinds.
#[must_use]
pub fn reference_result(rows: &[Option<Datum>]) -> Option<String> {
    let present: Vec<Datum> = rows.iter().flatten().copied().collect();
    let first = present.first()?;
    let mm = match first {
        Datum::Int2(_) => MinMax::Int2(ordered_extremes(&present, |d| match d {
            Datum::Int2(v) => *v,
            other => panic!("mixed kinds: {other:?}"),
        })),
        Datum::Int4(_) => MinMax::Int4(ordered_extremes(&present, |d| match d {
            Datum::Int4(v) => *v,
            other => panic!("mixed kinds: {other:?}"),
        })),
        Datum::Int8(_) => MinMax::Int8(ordered_extremes(&present, |d| match d {
            Datum::Int8(v) => *v,
            other => panic!("mixed kinds: {other:?}"),
        })),
        Datum::Float4(_) => {
            let e = ordered_extremes(&present, |d| match d {
                Datum::Float4(v) => OrderedFloat(*v),
                other => panic!("mixed kinds: {other:?}"),
            });
            MinMax::Float4(Extremes { min: e.min.0, max: e.max.0 })
        }
        Datum::Float8(_) => {
            let e = ordered_extremes(&present, |d| match d {
                Datum::Float8(v) => OrderedFloat(*v),
                other => panic!("mixed kinds: {other:?}"),
            });
            MinMax::Float8(Extremes { min: e.min.0, max: e.max.0 })
        }
    };
    Some(mm.to_string())
}

fn ordered_extremes<T: Ord + Copy>(present: &[Datum], get: impl Fn(&Datum) -> T) -> Extremes<T> {
    let mut values = present.iter().map(get);
    let first = values.next().expect("at least one present value");
    values.fold(Extremes { min: first, max: first }, |e, v| Extremes {
        min: e.min.min(v),
        max: e.max.max(v),
    })
}

/// Assert `min <= v <= max` for every present value of `rows`.
///
/// # Panics
///
/// Panics on the first value outside the bounds or of another kind.
pub fn assert_within_bounds(mm: &MinMax, rows: &[Option<Datum>]) {
    for (i, d) in rows.iter().enumerate() {
        let Some(d) = d else { continue };
        let inside = match (mm, d) {
            (MinMax::Int2(e), Datum::Int2(v)) => e.min <= *v && *v <= e.max,
            (MinMax::Int4(e), Datum::Int4(v)) => e.min <= *v && *v <= e.max,
            (MinMax::Int8(e), Datum::Int8(v)) => e.min <= *v && *v <= e.max,
            (MinMax::Float4(e), Datum::Float4(v)) => e.min <= *v && *v <= e.max,
            (MinMax::Float8(e), Datum::Float8(v)) => e.min <= *v && *v <= e.max,
            _ => panic!("row {i}: {d:?} is not of kind {}", mm.kind()),
        };
        assert!(inside, "row {i}: {d:?} outside {mm}");
    }
}
