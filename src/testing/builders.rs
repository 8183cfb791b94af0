//! Row builders for aggregate tests.

use crate::datum::Datum;

/// A fluent builder for one group's input rows.
///
/// # Example
///
/// ```
/// use min_to_max::testing::GroupBuilder;
///
/// let rows = GroupBuilder::new()
///     .value(5i32)
///     .null()
///     .values([-3i32, 12])
///     .build();
///
/// assert_eq!(rows.len(), 4);
/// ```
#[derive(Clone, Debug, Default)]
pub struct GroupBuilder {
    rows: Vec<Option<Datum>>,
}

impl GroupBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    #[must_use]
    pub fn value(mut self, v: impl Into<Datum>) -> Self {
        self.rows.push(Some(v.into()));
        self
    }

    #[must_use]
    pub fn values<T: Into<Datum>>(mut self, vs: impl IntoIterator<Item = T>) -> Self {
        self.rows.extend(vs.into_iter().map(|v| Some(v.into())));
        self
    }

    /// Add rows from a slice where `None` stands for SQL NULL.
    #[must_use]
    pub fn maybe_values<T: Into<Datum> + Copy>(mut self, vs: &[Option<T>]) -> Self {
        self.rows.extend(vs.iter().map(|v| v.map(Into::into)));
        self
    }

    #[must_use]
    pub fn null(self) -> Self {
        self.nulls(1)
    }

    #[must_use]
    pub fn nulls(mut self, count: usize) -> Self {
        self.rows.extend(std::iter::repeat_n(None, count));
        self
    }

    /// Deterministically permute the rows (Fisher-Yates over a fixed LCG).
    #[must_use]
    pub fn shuffled(mut self, seed: u32) -> Self {
        let mut state = seed;
        for i in (1..self.rows.len()).rev() {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let j = (state / 65536) as usize % (i + 1);
            self.rows.swap(i, j);
        }
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn build(self) -> Vec<Option<Datum>> {
        self.rows
    }

    /// Attach every row to `key`.
    #[must_use]
    pub fn keyed<K: Clone>(self, key: K) -> Vec<(K, Option<Datum>)> {
        self.rows.into_iter().map(|v| (key.clone(), v)).collect()
    }
}

/// `count` pseudo-random `INTEGER` rows per key over `num_keys` keys, with
/// every `null_every`-th row NULL (`0` disables NULLs).
///
/// ```
/// use min_to_max::testing::pseudo_random_groups;
///
/// let rows = pseudo_random_groups(3, 10, 4);
/// assert_eq!(rows.len(), 30);
/// assert!(rows.iter().any(|(_, v)| v.is_none()));
/// ```
#[must_use]
pub fn pseudo_random_groups(
    num_keys: usize,
    count: usize,
    null_every: usize,
) -> Vec<(String, Option<Datum>)> {
    let mut data = Vec::with_capacity(num_keys * count);
    let mut seed: u32 = 54321;
    let mut n = 0usize;

    for _ in 0..count {
        for key_idx in 0..num_keys {
            n += 1;
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let value = if null_every != 0 && n % null_every == 0 {
                None
            } else {
                Some(Datum::Int4((seed / 65536) as i32 % 10_000 - 5_000))
            };
            data.push((format!("key_{key_idx}"), value));
        }
    }
    data
}
