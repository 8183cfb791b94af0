//! In-process group driver.
//!
//! The [`Runner`] plays the host's role: it groups keyed rows, feeds each
//! group's rows through [`AggregateFn::add_input`] and calls
//! [`AggregateFn::finish`] exactly once per group.
//!
//! In [`ExecMode::Parallel`] the rows are split into contiguous partitions.
//! Every partition builds its own per-key partial accumulators on a rayon
//! worker, the partials are merged per key in partition order, and the merged
//! groups are finalized in parallel. A group's accumulator is owned by one
//! worker at a time and is never shared.

use crate::aggregate::{AggregateFn, MinToMax};
use crate::datum::Datum;
use crate::kind::SqlType;
#[cfg(feature = "metrics")]
use crate::metrics::{EMPTY_GROUPS, GROUPS_FINALIZED, MetricsCollector, NULL_ROWS, ROWS_STEPPED};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecMode {
    Sequential,
    /// `threads`: size of a dedicated pool (`None` uses rayon's global pool).
    /// `partitions`: number of row partitions (`None` uses the runner default).
    Parallel {
        threads: Option<usize>,
        partitions: Option<usize>,
    },
}

#[derive(Clone)]
pub struct Runner {
    pub mode: ExecMode,
    pub default_partitions: usize,
    #[cfg(feature = "metrics")]
    pub metrics: Option<MetricsCollector>,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            mode: ExecMode::Parallel {
                threads: None,
                partitions: None,
            },
            default_partitions: 2 * num_cpus::get().max(2),
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }
}

impl Runner {
    pub fn sequential() -> Self {
        Self {
            mode: ExecMode::Sequential,
            ..Default::default()
        }
    }

    pub fn parallel(threads: Option<usize>, partitions: Option<usize>) -> Self {
        Self {
            mode: ExecMode::Parallel { threads, partitions },
            ..Default::default()
        }
    }

    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// `min_to_max(value) ... GROUP BY key` over `rows`, one result per key,
    /// sorted by key.
    pub fn aggregate_by_key<K>(
        &self,
        declared: &SqlType,
        rows: Vec<(K, Option<Datum>)>,
    ) -> Result<Vec<(K, Option<String>)>>
    where
        K: Ord + Debug + Send + Sync + 'static,
    {
        #[cfg(feature = "metrics")]
        let counts = row_counts(rows.iter().map(|(_, v)| v));

        let out = self.combine_by_key(&MinToMax::new(declared.clone()), rows)?;

        #[cfg(feature = "metrics")]
        {
            self.record_rows(counts);
            self.record_groups(out.iter().map(|(_, r)| r));
        }
        Ok(out)
    }

    /// `min_to_max(value)` over all rows as a single group. No rows gives `None`.
    pub fn aggregate_all(&self, declared: &SqlType, rows: Vec<Option<Datum>>) -> Result<Option<String>> {
        #[cfg(feature = "metrics")]
        let counts = row_counts(rows.iter());

        let comb = MinToMax::new(declared.clone());
        let keyed: Vec<((), Option<Datum>)> = rows.into_iter().map(|v| ((), v)).collect();
        let mut out = self.combine_by_key(&comb, keyed)?;
        let result = match out.pop() {
            Some((_, r)) => r,
            // Zero rows: the group still finalizes, with no state.
            None => comb.finish(comb.create()).context("finalize empty input")?,
        };

        #[cfg(feature = "metrics")]
        {
            self.record_rows(counts);
            self.record_groups(std::iter::once(&result));
        }
        Ok(result)
    }

    /// Reduce `rows` per key with any [`AggregateFn`].
    pub fn combine_by_key<K, V, A, O, C>(&self, comb: &C, rows: Vec<(K, V)>) -> Result<Vec<(K, O)>>
    where
        K: Ord + Debug + Send + Sync + 'static,
        V: Send + 'static,
        A: Send + 'static,
        O: Send + 'static,
        C: AggregateFn<V, A, O>,
    {
        self.mark_start();

        let out = match self.mode {
            ExecMode::Sequential => {
                debug!(rows = rows.len(), "min_to_max: sequential run");
                local_groups::<K, V, A, O, C>(comb, rows).and_then(|groups| {
                    groups
                        .into_iter()
                        .map(|(k, acc)| finish_group::<K, V, A, O, C>(comb, k, acc))
                        .collect::<Result<Vec<_>>>()
                })
            }
            ExecMode::Parallel { threads, partitions } => {
                let parts = partitions.unwrap_or(self.default_partitions);
                debug!(rows = rows.len(), parts, ?threads, "min_to_max: parallel run");
                in_pool(threads, || exec_parallel::<K, V, A, O, C>(comb, rows, parts))
            }
        };

        self.mark_end();
        out
    }

    fn mark_start(&self) {
        #[cfg(feature = "metrics")]
        if let Some(m) = &self.metrics {
            m.record_start();
        }
    }

    fn mark_end(&self) {
        #[cfg(feature = "metrics")]
        if let Some(m) = &self.metrics {
            m.record_end();
        }
    }

    /// Only called once a run has succeeded, so failed runs leave the row
    /// counters untouched.
    #[cfg(feature = "metrics")]
    fn record_rows(&self, (rows, nulls): (u64, u64)) {
        if let Some(m) = &self.metrics {
            m.increment_counter(ROWS_STEPPED, rows);
            m.increment_counter(NULL_ROWS, nulls);
        }
    }

    #[cfg(feature = "metrics")]
    fn record_groups<'a>(&self, results: impl Iterator<Item = &'a Option<String>>) {
        if let Some(m) = &self.metrics {
            let (groups, empty) = results.fold((0u64, 0u64), |(g, e), r| (g + 1, e + u64::from(r.is_none())));
            m.increment_counter(GROUPS_FINALIZED, groups);
            m.increment_counter(EMPTY_GROUPS, empty);
        }
    }
}

/// `(rows, null rows)` of an input.
#[cfg(feature = "metrics")]
fn row_counts<'a>(values: impl Iterator<Item = &'a Option<Datum>>) -> (u64, u64) {
    values.fold((0, 0), |(r, n), v| (r + 1, n + u64::from(v.is_none())))
}

/// Run `f` on a dedicated pool of `threads` workers, or on the global pool.
fn in_pool<R, F>(threads: Option<usize>, f: F) -> Result<R>
where
    R: Send,
    F: FnOnce() -> Result<R> + Send,
{
    match threads {
        Some(t) => rayon::ThreadPoolBuilder::new()
            .num_threads(t)
            .build()
            .context("build rayon thread pool")?
            .install(f),
        None => f(),
    }
}

fn exec_parallel<K, V, A, O, C>(comb: &C, rows: Vec<(K, V)>, partitions: usize) -> Result<Vec<(K, O)>>
where
    K: Ord + Debug + Send + Sync,
    V: Send,
    A: Send,
    O: Send,
    C: AggregateFn<V, A, O>,
{
    let parts = split_vec(rows, partitions.max(1));

    let locals: Vec<BTreeMap<K, A>> = parts
        .into_par_iter()
        .map(|chunk| local_groups::<K, V, A, O, C>(comb, chunk))
        .collect::<Result<Vec<_>>>()?;

    let mut merged: BTreeMap<K, A> = BTreeMap::new();
    for local in locals {
        for (k, acc) in local {
            match merged.get_mut(&k) {
                Some(into) => comb
                    .merge(into, acc)
                    .with_context(|| format!("merge partial state for group {k:?}"))?,
                None => {
                    merged.insert(k, acc);
                }
            }
        }
    }

    merged
        .into_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(k, acc)| finish_group::<K, V, A, O, C>(comb, k, acc))
        .collect()
}

/// Fold one partition's rows into per-key accumulators.
fn local_groups<K, V, A, O, C>(comb: &C, rows: Vec<(K, V)>) -> Result<BTreeMap<K, A>>
where
    K: Ord + Debug,
    C: AggregateFn<V, A, O>,
{
    let mut map: BTreeMap<K, A> = BTreeMap::new();
    for (k, v) in rows {
        let mut acc = map.remove(&k).unwrap_or_else(|| comb.create());
        comb.add_input(&mut acc, v)
            .with_context(|| format!("step group {k:?}"))?;
        map.insert(k, acc);
    }
    Ok(map)
}

fn finish_group<K, V, A, O, C>(comb: &C, key: K, acc: A) -> Result<(K, O)>
where
    K: Debug,
    C: AggregateFn<V, A, O>,
{
    let out = comb
        .finish(acc)
        .with_context(|| format!("finalize group {key:?}"))?;
    Ok((key, out))
}

fn split_vec<T>(v: Vec<T>, n: usize) -> Vec<Vec<T>> {
    let len = v.len();
    if n <= 1 || len <= 1 {
        return vec![v];
    }
    let chunk = len.div_ceil(n);
    let mut out = Vec::with_capacity(n);
    let mut it = v.into_iter();
    loop {
        let part: Vec<T> = it.by_ref().take(chunk).collect();
        if part.is_empty() {
            break;
        }
        out.push(part);
    }
    out
}
