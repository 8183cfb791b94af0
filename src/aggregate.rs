//! The `min_to_max` entry points: `step`, `combine`, and `finalize`.
//!
//! The host calls [`step`] once per row, threading the returned state into the
//! next call, then [`finalize`] once per group. When a group is accumulated in
//! several partitions, [`combine`] concatenates the partial states before
//! finalizing.
//!
//! ```
//! use min_to_max::{CallContext, Datum, SqlType, finalize, step};
//!
//! let ctx = CallContext::Aggregate;
//! let mut state = None;
//! for v in [Some(5), None, Some(-3), Some(12), None, Some(0)] {
//!     state = Some(step(ctx, state, &SqlType::Integer, v.map(Datum::Int4))?);
//! }
//! assert_eq!(finalize(ctx, state)?, Some("-3->12".to_string()));
//! # Ok::<_, min_to_max::AggError>(())
//! ```

use crate::array::ArrayValue;
use crate::datum::Datum;
use crate::error::{AggError, AggResult};
use crate::extremes::MinMax;
use crate::kind::{NumericKind, SqlType};
use crate::state::MinMaxState;
use tracing::{debug, trace};

/// How the host is invoking an entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallContext {
    /// Grouped or plain aggregation.
    Aggregate,
    /// Aggregate used as a window function.
    WindowAggregate,
    /// Ordinary scalar function call.
    Scalar,
}

impl CallContext {
    pub fn is_aggregate(self) -> bool {
        matches!(self, CallContext::Aggregate | CallContext::WindowAggregate)
    }

    fn require_aggregate(self, function: &'static str) -> AggResult<()> {
        if self.is_aggregate() {
            Ok(())
        } else {
            Err(AggError::InvalidContext { function })
        }
    }
}

/// Append one row to the group's collection.
///
/// `state` is `None` on the first call of a group; the collection is then
/// created for `declared`, even when `value` is NULL.
pub fn step(
    ctx: CallContext,
    state: Option<MinMaxState>,
    declared: &SqlType,
    value: Option<Datum>,
) -> AggResult<MinMaxState> {
    let kind = resolve_row(ctx, declared, value)?;
    let mut state = match state {
        Some(s) if s.kind() != kind => return Err(AggError::kind_mismatch(s.kind(), kind)),
        Some(s) => s,
        None => {
            trace!(%kind, "min_to_max: new group state");
            MinMaxState::new(kind)
        }
    };
    state.push(value)?;
    trace!(len = state.len(), null = value.is_none(), "min_to_max: step");
    Ok(state)
}

/// Every check a row must pass before it touches a state: the declared type,
/// the calling context, then the value's own kind.
fn resolve_row(ctx: CallContext, declared: &SqlType, value: Option<Datum>) -> AggResult<NumericKind> {
    let kind = NumericKind::try_from(declared)?;
    ctx.require_aggregate("min_to_max_sfunc")?;
    match value {
        Some(d) if d.kind() != kind => Err(AggError::kind_mismatch(kind, d.kind())),
        _ => Ok(kind),
    }
}

/// Concatenate two partial states of the same group, `left` entries first.
pub fn combine(
    ctx: CallContext,
    left: Option<MinMaxState>,
    right: Option<MinMaxState>,
) -> AggResult<Option<MinMaxState>> {
    ctx.require_aggregate("min_to_max_combinefunc")?;
    Ok(match (left, right) {
        (None, other) | (other, None) => other,
        (Some(mut l), Some(r)) => {
            l.append(r)?;
            Some(l)
        }
    })
}

/// Produce the group's result.
///
/// `None` when the group saw no rows or only NULLs, otherwise
/// `"<min>-><max>"` rendered in the group's own kind.
pub fn finalize(ctx: CallContext, state: Option<MinMaxState>) -> AggResult<Option<String>> {
    ctx.require_aggregate("min_to_max_ffunc")?;
    let Some(state) = state else {
        debug!("min_to_max: finalize on empty group");
        return Ok(None);
    };
    finalize_array(&state.into_array())
}

/// Finalize an already materialized array.
pub fn finalize_array(array: &ArrayValue) -> AggResult<Option<String>> {
    Ok(array_extremes(array)?.map(|mm| mm.to_string()))
}

/// Typed extremes of a materialized array, `None` if every entry is NULL.
pub fn array_extremes(array: &ArrayValue) -> AggResult<Option<MinMax>> {
    if array.ndim() > 1 {
        return Err(AggError::MultiDimensional { ndim: array.ndim() });
    }
    let result = MinMax::of_column(array.column());
    debug!(
        kind = %array.kind(),
        len = array.column().len(),
        nulls = array.column().null_count(),
        found = result.is_some(),
        "min_to_max: finalize"
    );
    Ok(result)
}

/// Four-phase aggregate protocol with fallible steps.
///
/// - `create` builds the empty accumulator of a group.
/// - `add_input` folds one row into it.
/// - `merge` folds another partial accumulator of the same group into it.
/// - `finish` turns the accumulator into the group's output.
pub trait AggregateFn<V, A, O>: Send + Sync + 'static {
    fn create(&self) -> A;
    fn add_input(&self, acc: &mut A, v: V) -> AggResult<()>;
    fn merge(&self, acc: &mut A, other: A) -> AggResult<()>;
    fn finish(&self, acc: A) -> AggResult<O>;
}

/// `min_to_max(x)` for a fixed declared argument type.
#[derive(Clone, Debug)]
pub struct MinToMax {
    declared: SqlType,
}

impl MinToMax {
    pub fn new(declared: SqlType) -> Self {
        Self { declared }
    }

    pub fn declared(&self) -> &SqlType {
        &self.declared
    }
}

impl AggregateFn<Option<Datum>, Option<MinMaxState>, Option<String>> for MinToMax {
    fn create(&self) -> Option<MinMaxState> {
        None
    }

    /// On error `acc` is left as it was.
    fn add_input(&self, acc: &mut Option<MinMaxState>, v: Option<Datum>) -> AggResult<()> {
        let kind = resolve_row(CallContext::Aggregate, &self.declared, v)?;
        if let Some(state) = acc.as_ref().filter(|s| s.kind() != kind) {
            return Err(AggError::kind_mismatch(state.kind(), kind));
        }
        acc.get_or_insert_with(|| MinMaxState::new(kind)).push(v)
    }

    /// On error `acc` is left as it was.
    fn merge(&self, acc: &mut Option<MinMaxState>, other: Option<MinMaxState>) -> AggResult<()> {
        let Some(other) = other else {
            return Ok(());
        };
        match acc {
            Some(state) => state.append(other),
            None => {
                *acc = Some(other);
                Ok(())
            }
        }
    }

    fn finish(&self, acc: Option<MinMaxState>) -> AggResult<Option<String>> {
        finalize(CallContext::Aggregate, acc)
    }
}
