//! # Local Solver module.
//!
//! This module contains the local-optimizer capability consumed by the
//! multistart driver, the argmin-backed [`LocalSolver`] implementing it,
//! and the builders used to create and configure the shipped solvers.

pub mod builders;
pub mod runner;

pub use runner::{LocalSolver, LocalSolverError};

use crate::problem::Problem;
use crate::types::OptimizerResult;
use ndarray::Array1;

/// Capability trait for local optimizers
///
/// Given the problem and one start vector, run a single local optimization
/// to convergence or failure. Any conforming implementation can be handed
/// to the driver; the crate ships [`LocalSolver`], which wraps argmin's
/// solvers.
///
/// An error return is an ordinary outcome for one start: the driver
/// reports it and moves on to the next start. Implementations should map
/// internal failures (divergence, invalid configuration, solver crashes)
/// to [`LocalSolverError`] rather than panic.
pub trait LocalOptimizer<P: Problem> {
    /// Run one local optimization from `x0`
    fn minimize(&self, problem: &P, x0: &Array1<f64>)
        -> Result<OptimizerResult, LocalSolverError>;
}
