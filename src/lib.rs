//! # min_to_max
//!
//! The core of a `MIN_TO_MAX(x)` aggregate for SQL engines: for each group it
//! reports the smallest and largest non-NULL value of a numeric column as a
//! single string, `"<min>-><max>"`.
//!
//! ```text
//! SELECT dept, min_to_max(salary) FROM staff GROUP BY dept;
//!  dept  | min_to_max
//! -------+--------------
//!  eng   | 4200->13750
//!  ops   | 3100->8800
//! ```
//!
//! ## Key Features
//!
//! - **Two-phase reducer** - [`step`] once per row, [`finalize`] once per group
//! - **Parallel partials** - [`combine`] merges partial states of one group
//! - **Five numeric kinds** - `SMALLINT`, `INTEGER`, `BIGINT`, `REAL`,
//!   `DOUBLE PRECISION`, each compared and printed natively
//! - **NULL aware** - NULLs are kept in the state and skipped by the scan;
//!   empty and all-NULL groups finalize to `None`
//! - **Group driver** - [`Runner`] reduces keyed rows sequentially or on a
//!   rayon pool
//!
//! ## Quick Start
//!
//! ```
//! use min_to_max::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let rows = vec![
//!     ("a", Some(Datum::Int4(5))),
//!     ("a", None),
//!     ("a", Some(Datum::Int4(-3))),
//!     ("b", None),
//! ];
//!
//! let out = Runner::sequential().aggregate_by_key(&SqlType::Integer, rows)?;
//! assert_eq!(out, vec![("a", Some("-3->5".to_string())), ("b", None)]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Calling Protocol
//!
//! A host drives the entry points directly:
//!
//! 1. On the first row of a group, call [`step`] with `state = None`.
//! 2. On every later row, call [`step`] with the state returned last time.
//! 3. Optionally [`combine`] partial states built by other workers.
//! 4. Call [`finalize`] once. The state is consumed.
//!
//! Every entry point takes a [`CallContext`]; calling outside an aggregate
//! context is an error, as is declaring a non-numeric argument type.
//!
//! ## Output Format
//!
//! Integers print as exact decimals. Floats print the shortest decimal that
//! round-trips at their own width, switching to scientific notation for very
//! large or small magnitudes (`1e+20`), with `NaN`, `Infinity` and
//! `-Infinity` for non-finite values.
//!
//! ## Feature Flags
//!
//! - `metrics` - [`metrics::MetricsCollector`] support in the [`Runner`]
//! - `spilling` - `postcard` encoding of [`MinMaxState`]
//!
//! ## Module Overview
//!
//! - [`aggregate`] - entry points and the [`AggregateFn`] protocol
//! - [`state`] - the per-group accumulated column
//! - [`array`] - materialized arrays handed to the finalizer
//! - [`extremes`] - per-kind scan and formatting
//! - [`kind`] - host types and numeric kinds
//! - [`runner`] - in-process group driver
//! - [`testing`] - builders and assertions for tests

pub mod aggregate;
pub mod array;
pub mod datum;
pub mod error;
pub mod extremes;
pub mod kind;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod runner;
pub mod state;
pub mod testing;

pub use aggregate::{
    AggregateFn, CallContext, MinToMax, array_extremes, combine, finalize, finalize_array, step,
};
pub use array::ArrayValue;
pub use datum::Datum;
pub use error::{AggError, AggResult};
pub use extremes::{Extremes, MinMax};
pub use kind::{NumericKind, SUPPORTED_TYPES, SqlType};
pub use runner::{ExecMode, Runner};
pub use state::{Column, MinMaxState};
