//! Entry-point behavior: step/finalize protocol, NULL handling, and errors.

use anyhow::Result;
use min_to_max::testing::{GroupBuilder, assert_result};
use min_to_max::*;

const CTX: CallContext = CallContext::Aggregate;

fn run(declared: &SqlType, rows: Vec<Option<Datum>>) -> Result<Option<String>, AggError> {
    let mut state = None;
    for v in rows {
        state = Some(step(CTX, state, declared, v)?);
    }
    finalize(CTX, state)
}

#[test]
fn integer_group_with_nulls() -> Result<()> {
    let rows = GroupBuilder::new()
        .maybe_values(&[Some(5i32), None, Some(-3), Some(12), None, Some(0)])
        .build();
    assert_result(&run(&SqlType::Integer, rows)?, Some("-3->12"));
    Ok(())
}

#[test]
fn double_precision_group() -> Result<()> {
    let rows = GroupBuilder::new().values([1.5f64, 2.25, -0.75]).build();
    assert_result(&run(&SqlType::DoublePrecision, rows)?, Some("-0.75->2.25"));
    Ok(())
}

#[test]
fn all_null_group_is_none() -> Result<()> {
    let rows = GroupBuilder::new().nulls(2).build();
    assert_result(&run(&SqlType::SmallInt, rows)?, None);
    Ok(())
}

#[test]
fn zero_rows_is_none() -> Result<()> {
    assert_eq!(finalize(CTX, None)?, None);
    Ok(())
}

#[test]
fn single_value_repeats_on_both_sides() -> Result<()> {
    let rows = GroupBuilder::new().value(5i64).build();
    assert_result(&run(&SqlType::BigInt, rows)?, Some("5->5"));

    let rows = GroupBuilder::new().null().value(-2.5f32).null().build();
    assert_result(&run(&SqlType::Real, rows)?, Some("-2.5->-2.5"));
    Ok(())
}

#[test]
fn every_kind_reports_native_extremes() -> Result<()> {
    let cases: Vec<(SqlType, Vec<Option<Datum>>, &str)> = vec![
        (
            SqlType::SmallInt,
            GroupBuilder::new().values([i16::MAX, 0, i16::MIN]).build(),
            "-32768->32767",
        ),
        (
            SqlType::Integer,
            GroupBuilder::new().values([7i32, 3, 17]).build(),
            "3->17",
        ),
        (
            SqlType::BigInt,
            GroupBuilder::new().values([i64::MIN, 1, i64::MAX]).build(),
            "-9223372036854775808->9223372036854775807",
        ),
        (
            SqlType::Real,
            GroupBuilder::new().values([0.5f32, -2.5, 9.75]).build(),
            "-2.5->9.75",
        ),
        (
            SqlType::DoublePrecision,
            GroupBuilder::new().values([0.1f64, 0.2, 0.3]).build(),
            "0.1->0.3",
        ),
    ];
    for (ty, rows, expected) in cases {
        assert_result(&run(&ty, rows)?, Some(expected));
    }
    Ok(())
}

#[test]
fn first_step_creates_state_even_for_null() -> Result<()> {
    let state = step(CTX, None, &SqlType::Integer, None)?;
    assert_eq!(state.kind(), NumericKind::Int4);
    assert_eq!(state.len(), 1);
    assert_eq!(state.null_count(), 1);
    Ok(())
}

#[test]
fn state_preserves_call_order() -> Result<()> {
    let input = [Some(3i16), None, Some(-1), Some(3), None];
    let mut state = None;
    for v in input {
        state = Some(step(CTX, state, &SqlType::SmallInt, v.map(Datum::Int2))?);
    }
    let state = state.expect("state after steps");
    assert_eq!(state.len(), input.len());
    for (i, v) in input.iter().enumerate() {
        assert_eq!(state.column().get(i), Some(v.map(Datum::Int2)));
    }
    assert_eq!(state.column().get(input.len()), None);
    Ok(())
}

#[test]
fn window_context_is_accepted() -> Result<()> {
    let ctx = CallContext::WindowAggregate;
    let state = step(ctx, None, &SqlType::Integer, Some(Datum::Int4(4)))?;
    assert_eq!(finalize(ctx, Some(state))?, Some("4->4".to_string()));
    Ok(())
}

#[test]
fn scalar_context_is_rejected() {
    let err = step(CallContext::Scalar, None, &SqlType::Integer, Some(Datum::Int4(1))).unwrap_err();
    assert_eq!(err, AggError::InvalidContext { function: "min_to_max_sfunc" });

    let err = finalize(CallContext::Scalar, None).unwrap_err();
    assert_eq!(err, AggError::InvalidContext { function: "min_to_max_ffunc" });
    assert!(err.to_string().contains("non-aggregate context"));
}

#[test]
fn text_argument_is_unsupported() {
    let err = step(CTX, None, &SqlType::named("text"), None).unwrap_err();
    assert_eq!(
        err,
        AggError::UnsupportedType {
            found: SqlType::named("text")
        }
    );
    let msg = err.to_string();
    assert!(msg.contains(SUPPORTED_TYPES), "{msg}");
}

#[test]
fn unresolved_argument_type_is_invalid_kind() {
    let err = step(CTX, None, &SqlType::Unknown, Some(Datum::Int4(1))).unwrap_err();
    assert!(matches!(err, AggError::InvalidInputKind { .. }), "{err:?}");
}

#[test]
fn value_of_another_kind_is_rejected() -> Result<()> {
    let err = step(CTX, None, &SqlType::Integer, Some(Datum::Int8(1))).unwrap_err();
    assert!(matches!(err, AggError::InvalidInputKind { .. }), "{err:?}");

    let state = step(CTX, None, &SqlType::Integer, Some(Datum::Int4(1)))?;
    let err = step(CTX, Some(state), &SqlType::BigInt, Some(Datum::Int8(2))).unwrap_err();
    assert!(matches!(err, AggError::InvalidInputKind { .. }), "{err:?}");
    Ok(())
}

#[test]
fn nan_never_replaces_an_extreme() -> Result<()> {
    let rows = GroupBuilder::new().values([1.0f64, f64::NAN, 2.0]).build();
    assert_result(&run(&SqlType::DoublePrecision, rows)?, Some("1->2"));

    // A leading NaN is never compared away.
    let rows = GroupBuilder::new().values([f64::NAN, 1.0, 2.0]).build();
    assert_result(&run(&SqlType::DoublePrecision, rows)?, Some("NaN->NaN"));
    Ok(())
}

#[test]
fn integer_kinds_never_print_fractions() -> Result<()> {
    let rows = GroupBuilder::new().values([-40i32, 2, 1_000_000]).build();
    let out = run(&SqlType::Integer, rows)?.expect("result");
    assert!(!out.contains('.') && !out.contains('e'), "{out}");

    let rows = GroupBuilder::new().values([0.125f32, 4.5]).build();
    assert_result(&run(&SqlType::Real, rows)?, Some("0.125->4.5"));
    Ok(())
}

#[test]
fn aggregate_fn_protocol_matches_entry_points() -> Result<()> {
    let agg = MinToMax::new(SqlType::Integer);
    let mut left = agg.create();
    let mut right = agg.create();
    for v in [4, 9] {
        agg.add_input(&mut left, Some(Datum::Int4(v)))?;
    }
    for v in [Some(-2), None] {
        agg.add_input(&mut right, v.map(Datum::Int4))?;
    }
    agg.merge(&mut left, right)?;
    assert_eq!(left.as_ref().map(MinMaxState::len), Some(4));
    assert_eq!(agg.finish(left)?, Some("-2->9".to_string()));
    assert_eq!(agg.finish(agg.create())?, None);
    Ok(())
}

#[test]
fn failed_add_input_keeps_earlier_rows() -> Result<()> {
    let agg = MinToMax::new(SqlType::Integer);
    let mut acc = agg.create();
    agg.add_input(&mut acc, Some(Datum::Int4(4)))?;
    agg.add_input(&mut acc, None)?;

    let err = agg.add_input(&mut acc, Some(Datum::Float8(1.0))).unwrap_err();
    assert!(matches!(err, AggError::InvalidInputKind { .. }), "{err:?}");
    assert_eq!(acc.as_ref().map(MinMaxState::len), Some(2));

    let first = agg.add_input(&mut agg.create(), Some(Datum::Int8(1))).unwrap_err();
    assert!(matches!(first, AggError::InvalidInputKind { .. }), "{first:?}");

    agg.add_input(&mut acc, Some(Datum::Int4(-6)))?;
    assert_eq!(agg.finish(acc)?, Some("-6->4".to_string()));
    Ok(())
}

#[test]
fn failed_merge_keeps_the_accumulator() -> Result<()> {
    let agg = MinToMax::new(SqlType::Integer);
    let mut acc = agg.create();
    agg.add_input(&mut acc, Some(Datum::Int4(3)))?;

    let other = Some(step(CTX, None, &SqlType::BigInt, Some(Datum::Int8(9)))?);
    let err = agg.merge(&mut acc, other).unwrap_err();
    assert!(matches!(err, AggError::InvalidInputKind { .. }), "{err:?}");
    assert_eq!(acc.as_ref().map(MinMaxState::len), Some(1));

    agg.merge(&mut acc, None)?;
    let mut empty = agg.create();
    agg.merge(&mut empty, acc)?;
    assert_eq!(agg.finish(empty)?, Some("3->3".to_string()));
    Ok(())
}
