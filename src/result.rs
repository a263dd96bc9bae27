//! # Result module
//!
//! This module contains the result containers of a multistart batch: the
//! [`OptimizeResult`] collection of per-start outcomes and the
//! [`MultistartResult`] that pairs it with the problem it was produced for.
//!
//! The collection is append-only while the driver runs and is reordered
//! exactly once by the terminal [`OptimizeResult::sort`] call: entries are
//! ranked by non-decreasing objective value, with non-finite values after
//! all finite ones. The sort is stable, so ties keep their completion
//! order.

use crate::problem::Problem;
use crate::types::OptimizerResult;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

/// Rank two objective values, treating any non-finite value as maximal
///
/// Non-finite values compare equal to each other so the stable sort leaves
/// their relative order untouched.
fn compare_fvals(a: f64, b: f64) -> Ordering {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Default)]
/// The ordered collection of per-start outcomes of a multistart batch
///
/// One entry per start that ran to completion; starts whose solver failed
/// contribute nothing. An empty collection (every start failed) is valid,
/// and [`best`](OptimizeResult::best) answers `None` for it.
pub struct OptimizeResult {
    results: Vec<OptimizerResult>,
}

impl OptimizeResult {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one outcome at the end, preserving completion order
    pub fn append(&mut self, optimizer_result: OptimizerResult) {
        self.results.push(optimizer_result);
    }

    /// Sort entries by objective value, non-finite values last
    ///
    /// Stable and idempotent; the driver calls this once per batch, after
    /// all starts have been attempted.
    pub fn sort(&mut self) {
        self.results.sort_by(|a, b| compare_fvals(a.fval, b.fval));
    }

    /// Returns the best entry, or `None` if no start succeeded
    ///
    /// After [`sort`](OptimizeResult::sort) this is the entry at index 0.
    pub fn best(&self) -> Option<&OptimizerResult> {
        self.results
            .iter()
            .min_by(|a, b| compare_fvals(a.fval, b.fval))
    }

    /// Returns the number of recorded outcomes
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if no start succeeded
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns an iterator over the outcomes in the current order
    pub fn iter(&self) -> impl Iterator<Item = &OptimizerResult> {
        self.results.iter()
    }
}

impl Index<usize> for OptimizeResult {
    type Output = OptimizerResult;

    /// Returns the outcome at the given index
    fn index(&self, index: usize) -> &Self::Output {
        &self.results[index]
    }
}

impl fmt::Display for OptimizeResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "━━━━━━━━━ Multistart Result ━━━━━━━━━")?;
        writeln!(f, "Recorded starts: {}", self.results.len())?;
        if let Some(best) = self.best() {
            writeln!(f, "Best objective value: {:.8e}", best.fval)?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;

        for (i, result) in self.results.iter().enumerate() {
            writeln!(f, "Start result #{}", i + 1)?;
            writeln!(f, "  Objective: {:.8e}", result.fval)?;
            writeln!(f, "  Parameters:")?;
            writeln!(f, "    {:.8e}", result.x)?;

            if i < self.results.len() - 1 {
                writeln!(f, "―――――――――――――――――――――――――――――――――――――")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Top-level result of one or more multistart batches
///
/// Owns the [`OptimizeResult`] collection together with (a clone of) the
/// problem it was produced for. Passing a previous `MultistartResult` back
/// into the driver appends the new batch's outcomes to the same collection
/// rather than replacing them.
pub struct MultistartResult<P: Problem + Clone> {
    /// The problem the batches were run on
    pub problem: P,

    /// The accumulated per-start outcomes
    pub optimize_result: OptimizeResult,
}

impl<P: Problem + Clone> MultistartResult<P> {
    /// Create an empty result bound to a problem
    pub fn new(problem: P) -> Self {
        Self {
            problem,
            optimize_result: OptimizeResult::new(),
        }
    }

    /// Returns the best recorded outcome, or `None` if there is none
    pub fn best(&self) -> Option<&OptimizerResult> {
        self.optimize_result.best()
    }
}
