use anyhow::Result;
use min_to_max::testing::{GroupBuilder, assert_result, assert_within_bounds, pseudo_random_groups, reference_result};
use min_to_max::*;
use std::collections::BTreeMap;

fn by_key(rows: &[(String, Option<Datum>)]) -> BTreeMap<String, Vec<Option<Datum>>> {
    let mut groups: BTreeMap<String, Vec<Option<Datum>>> = BTreeMap::new();
    for (k, v) in rows {
        groups.entry(k.clone()).or_default().push(*v);
    }
    groups
}

#[test]
fn grouped_results_sorted_by_key() -> Result<()> {
    let mut rows = GroupBuilder::new().values([7i32, -2]).null().keyed("b");
    rows.extend(GroupBuilder::new().nulls(3).keyed("c"));
    rows.extend(GroupBuilder::new().value(11i32).keyed("a"));

    let out = Runner::sequential().aggregate_by_key(&SqlType::Integer, rows)?;
    assert_eq!(
        out,
        vec![
            ("a", Some("11->11".to_string())),
            ("b", Some("-2->7".to_string())),
            ("c", None),
        ]
    );
    Ok(())
}

#[test]
fn sequential_and_parallel_agree() -> Result<()> {
    let rows = pseudo_random_groups(13, 200, 7);

    let seq = Runner::sequential().aggregate_by_key(&SqlType::Integer, rows.clone())?;
    let par = Runner::parallel(Some(2), Some(7)).aggregate_by_key(&SqlType::Integer, rows.clone())?;
    let default = Runner::default().aggregate_by_key(&SqlType::Integer, rows)?;

    assert_eq!(seq.len(), 13);
    assert_eq!(seq, par);
    assert_eq!(seq, default);
    Ok(())
}

#[test]
fn results_match_reference_and_bracket_every_value() -> Result<()> {
    let rows = pseudo_random_groups(5, 300, 3);
    let groups = by_key(&rows);

    let out = Runner::parallel(None, Some(4)).aggregate_by_key(&SqlType::Integer, rows)?;
    for (key, result) in &out {
        let values = &groups[key];
        assert_eq!(result, &reference_result(values), "group {key}");

        let state = values
            .iter()
            .try_fold(None, |s, v| step(CallContext::Aggregate, s, &SqlType::Integer, *v).map(Some))?;
        let mm = array_extremes(&state.expect("non-empty group").into_array())?.expect("present values");
        assert_within_bounds(&mm, values);
    }
    Ok(())
}

#[test]
fn row_order_does_not_change_the_result() -> Result<()> {
    let base = GroupBuilder::new()
        .values([3.5f64, -12.0, 0.0, 99.25, -12.0])
        .nulls(4);
    let expected = reference_result(&base.clone().build());
    assert_eq!(expected.as_deref(), Some("-12->99.25"));

    for seed in [1, 7, 42, 1234] {
        let rows = base.clone().shuffled(seed).build();
        let out = Runner::parallel(None, Some(3)).aggregate_all(&SqlType::DoublePrecision, rows)?;
        assert_eq!(out, expected, "seed {seed}");
    }
    Ok(())
}

#[test]
fn aggregate_all_without_rows_is_none() -> Result<()> {
    assert_result(&Runner::sequential().aggregate_all(&SqlType::Real, vec![])?, None);
    assert_result(&Runner::default().aggregate_all(&SqlType::Real, vec![])?, None);
    Ok(())
}

#[test]
fn aggregate_all_single_group() -> Result<()> {
    let rows = GroupBuilder::new().values([5i16, -5]).null().build();
    let out = Runner::parallel(Some(3), Some(2)).aggregate_all(&SqlType::SmallInt, rows)?;
    assert_result(&out, Some("-5->5"));
    Ok(())
}

#[test]
fn more_partitions_than_rows() -> Result<()> {
    let rows = GroupBuilder::new().value(8i64).keyed(1u8);
    let out = Runner::parallel(None, Some(64)).aggregate_by_key(&SqlType::BigInt, rows)?;
    assert_eq!(out, vec![(1u8, Some("8->8".to_string()))]);
    Ok(())
}

#[test]
fn step_errors_carry_the_group_key() {
    let rows = vec![("k1", Some(Datum::Int4(1))), ("k2", Some(Datum::Float8(2.0)))];

    for runner in [Runner::sequential(), Runner::parallel(None, Some(2))] {
        let err = runner.aggregate_by_key(&SqlType::Integer, rows.clone()).unwrap_err();
        assert!(format!("{err:#}").contains("\"k2\""), "{err:#}");
        let root = err.root_cause().downcast_ref::<AggError>();
        assert!(matches!(root, Some(AggError::InvalidInputKind { .. })), "{err:?}");
    }
}

#[test]
fn unsupported_type_fails_the_run() {
    let rows = GroupBuilder::new().value(1i32).keyed("x");
    let err = Runner::sequential()
        .aggregate_by_key(&SqlType::named("text"), rows)
        .unwrap_err();
    assert!(matches!(
        err.root_cause().downcast_ref::<AggError>(),
        Some(AggError::UnsupportedType { .. })
    ));
}

/// Max of the absolute value of each group, reusing the driver with another
/// accumulator.
struct MaxAbs;

impl AggregateFn<i64, Option<i64>, Option<i64>> for MaxAbs {
    fn create(&self) -> Option<i64> {
        None
    }

    fn add_input(&self, acc: &mut Option<i64>, v: i64) -> AggResult<()> {
        *acc = Some(acc.map_or(v.abs(), |a| a.max(v.abs())));
        Ok(())
    }

    fn merge(&self, acc: &mut Option<i64>, other: Option<i64>) -> AggResult<()> {
        *acc = match (*acc, other) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        Ok(())
    }

    fn finish(&self, acc: Option<i64>) -> AggResult<Option<i64>> {
        Ok(acc)
    }
}

#[test]
fn combine_by_key_drives_any_aggregate() -> Result<()> {
    let rows: Vec<(u32, i64)> = (0..1000).map(|i| (i % 4, i64::from(i) - 600)).collect();

    let seq = Runner::sequential().combine_by_key(&MaxAbs, rows.clone())?;
    let par = Runner::parallel(Some(4), Some(9)).combine_by_key(&MaxAbs, rows)?;

    assert_eq!(seq, par);
    assert_eq!(seq, vec![(0, Some(600)), (1, Some(599)), (2, Some(598)), (3, Some(597))]);
    Ok(())
}

#[test]
fn signed_zeros_keep_the_first_seen() -> Result<()> {
    let runner = Runner::sequential();
    let pos_first = GroupBuilder::new().values([0.0f64, -0.0]).build();
    let neg_first = GroupBuilder::new().values([-0.0f64, 0.0]).build();

    assert_result(&runner.aggregate_all(&SqlType::DoublePrecision, pos_first)?, Some("0->0"));
    assert_result(&runner.aggregate_all(&SqlType::DoublePrecision, neg_first)?, Some("-0->-0"));

    // Any other value breaks the tie for that side.
    let rows = GroupBuilder::new().values([-0.0f32, 0.0, 1.5]).build();
    assert_result(&runner.aggregate_all(&SqlType::Real, rows)?, Some("-0->1.5"));
    Ok(())
}
