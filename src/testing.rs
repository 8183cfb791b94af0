//! Testing utilities for `min_to_max` callers.
//!
//! - **Builders**: [`GroupBuilder`] assembles one group's rows, NULLs included;
//!   [`pseudo_random_groups`] produces reproducible keyed input.
//! - **Assertions**: [`assert_result`] compares formatted results,
//!   [`assert_within_bounds`] checks the min/max bracket, and
//!   [`reference_result`] recomputes the expected string with a total order.
//!
//! # Quick Start
//!
//! ```
//! use min_to_max::*;
//! use min_to_max::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let rows = GroupBuilder::new().values([1.5f64, 2.25, -0.75]).build();
//! let out = Runner::sequential().aggregate_all(&SqlType::DoublePrecision, rows.clone())?;
//!
//! assert_result(&out, Some("-0.75->2.25"));
//! assert_eq!(out, reference_result(&rows));
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod builders;

pub use assertions::*;
pub use builders::*;
