//! # Optimize module
//!
//! This module contains the multistart driver: it samples a batch of
//! starting points, runs one local optimization per start, isolates and
//! reports per-start failures without aborting the batch, and returns the
//! accumulated, rank-sorted result.
//!
//! The entry point is [`minimize`]; [`Multistart`] is the underlying
//! driver struct for callers who want to attach an
//! [`Observer`](crate::observers::Observer).
//!
//! ## Example
//! ```rust
//! use multistart::local_solver::builders::NelderMeadBuilder;
//! use multistart::local_solver::runner::LocalSolver;
//! use multistart::optimize::minimize;
//! use multistart::problem::Problem;
//! use multistart::startpoint::Uniform;
//! use multistart::types::{EvaluationError, LocalSolverType};
//! use ndarray::{array, Array1, Array2};
//!
//! #[derive(Debug, Clone)]
//! struct Paraboloid;
//!
//! impl Problem for Paraboloid {
//!     fn objective(&self, x: &Array1<f64>) -> Result<f64, EvaluationError> {
//!         Ok((x[0] - 1.0).powi(2) + x[1].powi(2))
//!     }
//!
//!     fn variable_bounds(&self) -> Array2<f64> {
//!         array![[-5.0, 5.0], [-5.0, 5.0]]
//!     }
//! }
//!
//! let solver = LocalSolver::new(
//!     LocalSolverType::NelderMead,
//!     NelderMeadBuilder::default().build(),
//! );
//! let result = minimize(&Paraboloid, &solver, 4, Some(&Uniform::new(1)), None)?;
//!
//! let best = result.best().expect("at least one start succeeded");
//! assert!(best.fval < 1e-6);
//! # Ok::<(), multistart::optimize::MultistartError>(())
//! ```

use crate::local_solver::{LocalOptimizer, LocalSolverError};
use crate::observers::Observer;
use crate::problem::{Problem, VariableBounds};
use crate::result::MultistartResult;
use crate::startpoint::{StartpointError, StartpointMethod};
use crate::types::OptimizerResult;
use ndarray::{Array1, Array2};
use thiserror::Error;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[derive(Debug, Error)]
/// Errors that abort a whole multistart batch
///
/// A failure inside a single start is never one of these; it is reported
/// on stderr and the batch continues.
pub enum MultistartError {
    /// Error when the batch is empty
    #[error("Multistart Error: n_starts must be at least 1.")]
    InvalidStartCount,

    /// Error when the startpoint method returns a matrix of the wrong shape
    #[error("Multistart Error: startpoint matrix has shape ({rows}, {cols}), expected ({expected_rows}, {expected_cols}).")]
    StartpointShape {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    /// Error while generating the startpoint matrix
    #[error(transparent)]
    Startpoint(#[from] StartpointError),
}

/// The multistart driver
///
/// Borrows the problem and the local optimizer for the duration of a run
/// and never mutates either. An optional [`Observer`] records batch
/// metrics; read it back with [`observer`](Multistart::observer) after the
/// run.
pub struct Multistart<'a, P, O> {
    problem: &'a P,
    optimizer: &'a O,
    observer: Option<Observer>,
}

impl<'a, P, O> Multistart<'a, P, O>
where
    P: Problem + Clone + Send + Sync,
    O: LocalOptimizer<P> + Sync,
{
    /// Create a new driver for the given problem and local optimizer
    pub fn new(problem: &'a P, optimizer: &'a O) -> Self {
        Self {
            problem,
            optimizer,
            observer: None,
        }
    }

    /// Attach an observer to the driver
    pub fn add_observer(mut self, observer: Observer) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Access the attached observer, if any
    pub fn observer(&self) -> Option<&Observer> {
        self.observer.as_ref()
    }

    /// Run `n_starts` independent local optimizations and return the
    /// accumulated, sorted result
    ///
    /// Passing `None` as the startpoint method is the sentinel for solvers
    /// that do not consume starting points: the start matrix is filled
    /// with zeros. Note that the zeros are produced regardless of the
    /// bounds, so a box that excludes the origin gets out-of-bounds (and
    /// uninformative) starts; pass a real method if the solver reads them.
    ///
    /// Passing a previous result appends this batch's outcomes to it; the
    /// whole collection is re-sorted once at the end. A start whose solver
    /// returns an error contributes no entry, so `n_starts` is an upper
    /// bound on, not a guarantee of, the number of recorded outcomes.
    pub fn run(
        &mut self,
        n_starts: usize,
        startpoint_method: Option<&dyn StartpointMethod>,
        result: Option<MultistartResult<P>>,
    ) -> Result<MultistartResult<P>, MultistartError> {
        if n_starts == 0 {
            return Err(MultistartError::InvalidStartCount);
        }

        let bounds = VariableBounds::from_problem(self.problem);
        let startpoints = match startpoint_method {
            None => Array2::zeros((n_starts, bounds.dim())),
            Some(method) => {
                let matrix = method.sample(
                    n_starts,
                    &bounds.lower,
                    &bounds.upper,
                    &self.problem.initial_guesses(),
                )?;
                if matrix.nrows() != n_starts || matrix.ncols() != bounds.dim() {
                    return Err(MultistartError::StartpointShape {
                        expected_rows: n_starts,
                        expected_cols: bounds.dim(),
                        rows: matrix.nrows(),
                        cols: matrix.ncols(),
                    });
                }
                matrix
            }
        };

        let mut result = result.unwrap_or_else(|| MultistartResult::new(self.problem.clone()));

        if let Some(observer) = &mut self.observer {
            observer.on_batch_start(n_starts);
        }

        let starts: Vec<Array1<f64>> = startpoints
            .rows()
            .into_iter()
            .map(|row| row.to_owned())
            .collect();

        #[cfg(not(feature = "rayon"))]
        for (j, x0) in starts.iter().enumerate() {
            let outcome = self.optimizer.minimize(self.problem, x0);
            if let Err(err) = &outcome {
                eprintln!("start {} failed: {}", j, err);
            }
            self.record(j, outcome, &mut result);
        }

        #[cfg(feature = "rayon")]
        {
            let problem = self.problem;
            let optimizer = self.optimizer;
            let outcomes: Vec<(usize, Result<OptimizerResult, LocalSolverError>)> = starts
                .par_iter()
                .enumerate()
                .map(|(j, x0)| {
                    let outcome = optimizer.minimize(problem, x0);
                    if let Err(err) = &outcome {
                        eprintln!("start {} failed: {}", j, err);
                    }
                    (j, outcome)
                })
                .collect();
            for (j, outcome) in outcomes {
                self.record(j, outcome, &mut result);
            }
        }

        if let Some(observer) = &mut self.observer {
            observer.on_batch_end();
        }

        result.optimize_result.sort();
        Ok(result)
    }

    /// Fold one start's outcome into the result and the observer
    fn record(
        &mut self,
        index: usize,
        outcome: Result<OptimizerResult, LocalSolverError>,
        result: &mut MultistartResult<P>,
    ) {
        match outcome {
            Ok(run) => {
                if let Some(observer) = &mut self.observer {
                    observer.on_start_completed(index, &run);
                }
                result.optimize_result.append(run);
            }
            Err(err) => {
                if let Some(observer) = &mut self.observer {
                    observer.on_start_failed(index, &err);
                }
            }
        }
    }
}

/// Perform multistart local optimization
///
/// This is the main function to be called to run a multistart batch: it
/// resolves the starting points, dispatches `n_starts` runs of `optimizer`
/// on `problem`, reports each failed start on stderr without aborting the
/// batch, and returns the result collection sorted by objective value with
/// non-finite values last.
///
/// See [`Multistart::run`] for the semantics of the `startpoint_method`
/// sentinel and of passing a previous `result` back in.
pub fn minimize<P, O>(
    problem: &P,
    optimizer: &O,
    n_starts: usize,
    startpoint_method: Option<&dyn StartpointMethod>,
    result: Option<MultistartResult<P>>,
) -> Result<MultistartResult<P>, MultistartError>
where
    P: Problem + Clone + Send + Sync,
    O: LocalOptimizer<P> + Sync,
{
    Multistart::new(problem, optimizer).run(n_starts, startpoint_method, result)
}
