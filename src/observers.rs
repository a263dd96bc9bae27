//! # Observers Module
//!
//! This module provides observer functionality to monitor a multistart
//! batch while it executes. An observer attached to the driver records one
//! entry per attempted start and aggregates summary metrics:
//!
//! - Starts attempted, succeeded and failed
//! - Best objective value seen so far
//! - Cumulative objective function evaluations
//! - Per-start and total wall-clock time (when enabled)
//!
//! In verbose mode the observer also reports batch progress on stderr, one
//! line per completed start. Failed starts are reported by the driver
//! itself regardless of any observer.
//!
//! ## Example Usage
//!
//! ```rust
//! use multistart::local_solver::builders::NelderMeadBuilder;
//! use multistart::local_solver::runner::LocalSolver;
//! use multistart::observers::Observer;
//! use multistart::optimize::Multistart;
//! use multistart::startpoint::Uniform;
//! use multistart::types::LocalSolverType;
//! # use multistart::problem::Problem;
//! # use multistart::types::EvaluationError;
//! # use ndarray::{array, Array1, Array2};
//! #
//! # #[derive(Debug, Clone)]
//! # struct TestProblem;
//! # impl Problem for TestProblem {
//! #     fn objective(&self, x: &Array1<f64>) -> Result<f64, EvaluationError> {
//! #         Ok(x[0].powi(2) + x[1].powi(2))
//! #     }
//! #     fn variable_bounds(&self) -> Array2<f64> {
//! #         array![[-5.0, 5.0], [-5.0, 5.0]]
//! #     }
//! # }
//!
//! let problem = TestProblem;
//! let solver = LocalSolver::new(
//!     LocalSolverType::NelderMead,
//!     NelderMeadBuilder::default().build(),
//! );
//!
//! let mut driver = Multistart::new(&problem, &solver)
//!     .add_observer(Observer::new().with_timing());
//!
//! let result = driver.run(5, Some(&Uniform::new(0)), None)?;
//! println!("recorded outcomes: {}", result.optimize_result.len());
//!
//! if let Some(observer) = driver.observer() {
//!     println!("starts attempted: {}", observer.n_attempted());
//!     println!("starts failed: {}", observer.n_failed());
//!     println!("best objective: {:.8}", observer.best_objective());
//!     println!("function evaluations: {}", observer.function_evaluations());
//!     if let Some(time) = observer.total_time() {
//!         println!("total time: {:.3}s", time);
//!     }
//! }
//! # Ok::<(), multistart::optimize::MultistartError>(())
//! ```

use crate::types::OptimizerResult;
use std::time::Instant;

#[derive(Debug, Clone)]
/// How one attempted start ended
pub enum StartOutcome {
    /// The local solver ran to completion with this objective value
    Completed { fval: f64 },

    /// The local solver raised; the error rendered as text
    Failed { error: String },
}

#[derive(Debug, Clone)]
/// Record of one attempted start
pub struct StartRecord {
    /// Index of the start within its batch
    pub index: usize,

    /// How the start ended
    pub outcome: StartOutcome,

    /// Wall-clock time of the run (seconds), if measured
    pub time: Option<f64>,
}

#[derive(Debug, Clone, Default)]
/// Observer for a multistart batch
///
/// Collects per-start records and summary metrics while the driver runs.
/// Attach with [`Multistart::add_observer`](crate::optimize::Multistart::add_observer)
/// and read the metrics back through
/// [`Multistart::observer`](crate::optimize::Multistart::observer) after
/// the run.
pub struct Observer {
    verbose: bool,
    timing: bool,
    records: Vec<StartRecord>,
    n_failed: usize,
    best_objective: Option<f64>,
    function_evaluations: u64,
    batch_start: Option<Instant>,
    total_time: Option<f64>,
}

impl Observer {
    /// Create a new observer with all tracking disabled but record keeping on
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable batch timing
    pub fn with_timing(mut self) -> Self {
        self.timing = true;
        self
    }

    /// Report per-start progress on stderr while the batch runs
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Number of starts attempted so far
    pub fn n_attempted(&self) -> usize {
        self.records.len()
    }

    /// Number of starts whose solver failed
    pub fn n_failed(&self) -> usize {
        self.n_failed
    }

    /// Number of starts that completed
    pub fn n_succeeded(&self) -> usize {
        self.records.len() - self.n_failed
    }

    /// Best objective value seen so far, NaN while no start has completed
    pub fn best_objective(&self) -> f64 {
        self.best_objective.unwrap_or(f64::NAN)
    }

    /// Cumulative objective function evaluations across completed starts
    pub fn function_evaluations(&self) -> u64 {
        self.function_evaluations
    }

    /// Total batch wall-clock time in seconds, if timing was enabled
    pub fn total_time(&self) -> Option<f64> {
        self.total_time
    }

    /// The per-start records in completion order
    pub fn records(&self) -> &[StartRecord] {
        &self.records
    }

    pub(crate) fn on_batch_start(&mut self, n_starts: usize) {
        if self.timing {
            self.batch_start = Some(Instant::now());
        }
        if self.verbose {
            eprintln!("[multistart] dispatching {} starts", n_starts);
        }
    }

    pub(crate) fn on_start_completed(&mut self, index: usize, result: &OptimizerResult) {
        self.function_evaluations += result.n_fev;
        if result.fval.is_finite()
            && self.best_objective.map_or(true, |best| result.fval < best)
        {
            self.best_objective = Some(result.fval);
        }
        self.records.push(StartRecord {
            index,
            outcome: StartOutcome::Completed { fval: result.fval },
            time: result.time.map(|t| t.as_secs_f64()),
        });
        if self.verbose {
            eprintln!(
                "[multistart] start {} completed: objective {:.8e}",
                index, result.fval
            );
        }
    }

    pub(crate) fn on_start_failed(&mut self, index: usize, error: &dyn std::fmt::Display) {
        self.n_failed += 1;
        self.records.push(StartRecord {
            index,
            outcome: StartOutcome::Failed {
                error: error.to_string(),
            },
            time: None,
        });
    }

    pub(crate) fn on_batch_end(&mut self) {
        if let Some(started) = self.batch_start.take() {
            let elapsed = started.elapsed().as_secs_f64();
            self.total_time = Some(self.total_time.unwrap_or(0.0) + elapsed);
        }
        if self.verbose {
            eprintln!(
                "[multistart] batch finished: {}/{} starts completed, best objective {:.8e}",
                self.n_succeeded(),
                self.n_attempted(),
                self.best_objective()
            );
        }
    }
}

#[cfg(test)]
mod tests_observers {
    use super::*;
    use argmin::core::{TerminationReason, TerminationStatus};
    use ndarray::array;
    use std::time::Duration;

    fn completed(fval: f64, n_fev: u64) -> OptimizerResult {
        OptimizerResult {
            x: array![0.0],
            fval,
            x0: array![0.0],
            termination: TerminationStatus::Terminated(TerminationReason::SolverConverged),
            n_iter: 3,
            n_fev,
            n_gev: 0,
            time: Some(Duration::from_millis(5)),
        }
    }

    #[test]
    /// Test counting completed and failed starts
    fn test_observer_counts() {
        let mut observer = Observer::new();
        observer.on_batch_start(3);
        observer.on_start_completed(0, &completed(2.0, 10));
        observer.on_start_failed(1, &"solver diverged");
        observer.on_start_completed(2, &completed(1.0, 7));
        observer.on_batch_end();

        assert_eq!(observer.n_attempted(), 3);
        assert_eq!(observer.n_failed(), 1);
        assert_eq!(observer.n_succeeded(), 2);
        assert_eq!(observer.function_evaluations(), 17);
    }

    #[test]
    /// Test best objective tracking, ignoring non-finite values
    fn test_observer_best_objective() {
        let mut observer = Observer::new();
        assert!(observer.best_objective().is_nan());

        observer.on_start_completed(0, &completed(f64::NAN, 1));
        assert!(observer.best_objective().is_nan());

        observer.on_start_completed(1, &completed(4.0, 1));
        observer.on_start_completed(2, &completed(-2.0, 1));
        observer.on_start_completed(3, &completed(0.5, 1));
        assert_eq!(observer.best_objective(), -2.0);
    }

    #[test]
    /// Test the per-start records, including the rendered failure text
    fn test_observer_records() {
        let mut observer = Observer::new();
        observer.on_start_completed(0, &completed(2.0, 1));
        observer.on_start_failed(1, &"stiff system blew up");

        let records = observer.records();
        assert_eq!(records.len(), 2);
        assert!(matches!(
            records[0].outcome,
            StartOutcome::Completed { fval } if fval == 2.0
        ));
        assert_eq!(records[0].time, Some(0.005));
        match &records[1].outcome {
            StartOutcome::Failed { error } => assert_eq!(error, "stiff system blew up"),
            other => panic!("Expected a failure record, got {:?}", other),
        }
    }

    #[test]
    /// Test that total time is only measured when timing is enabled
    fn test_observer_timing() {
        let mut untimed = Observer::new();
        untimed.on_batch_start(1);
        untimed.on_batch_end();
        assert!(untimed.total_time().is_none());

        let mut timed = Observer::new().with_timing();
        timed.on_batch_start(1);
        timed.on_batch_end();
        assert!(timed.total_time().is_some());
    }

    #[test]
    /// Test that timing accumulates across two batches
    fn test_observer_timing_accumulates() {
        let mut observer = Observer::new().with_timing();
        observer.on_batch_start(1);
        observer.on_batch_end();
        let first = observer.total_time().unwrap();

        observer.on_batch_start(1);
        observer.on_batch_end();
        assert!(observer.total_time().unwrap() >= first);
    }
}
