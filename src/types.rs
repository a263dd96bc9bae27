//! # Types module
//!
//! This module contains the types shared across the crate: the evaluation
//! error type surfaced by [`Problem`](crate::problem::Problem)
//! implementations, the per-start [`OptimizerResult`], and the local solver
//! type selector.

use ndarray::Array1;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use argmin::core::TerminationStatus;

#[derive(Debug, Error)]
/// Error type for objective, gradient and hessian evaluation
pub enum EvaluationError {
    /// Error when the input is invalid
    #[error("Invalid input: {0}.")]
    InvalidInput(String),

    /// Error when the underlying model simulation does not produce a value
    ///
    /// Typical for objectives backed by a numerical integrator that
    /// diverges or fails to converge at the given parameters.
    #[error("Simulation failed: {0}.")]
    SimulationFailed(String),

    /// Error when the gradient is not implemented
    #[error("Gradient not implemented and needed for local solver.")]
    GradientNotImplemented,

    /// Error when the hessian is not implemented
    #[error("Hessian not implemented and needed for local solver.")]
    HessianNotImplemented,
}

#[derive(Debug, Clone)]
/// The outcome of one local-optimization run
///
/// Produced once per start that ran to completion and immutable thereafter.
/// Besides the achieved point and objective value, it records where the run
/// started, how it terminated, and how much work it did.
pub struct OptimizerResult {
    /// The best parameter vector found by the run
    pub x: Array1<f64>,

    /// The objective function value at `x`
    ///
    /// A non-finite value here is legal; the result collection sorts such
    /// entries after all finite ones.
    pub fval: f64,

    /// The starting point the run was dispatched from
    pub x0: Array1<f64>,

    /// How the local solver terminated
    pub termination: TerminationStatus,

    /// Number of solver iterations
    pub n_iter: u64,

    /// Number of objective function evaluations
    pub n_fev: u64,

    /// Number of gradient evaluations
    pub n_gev: u64,

    /// Wall-clock time of the run, if measured
    pub time: Option<Duration>,
}

impl OptimizerResult {
    /// Returns the objective function value (f64) at the solution point
    ///
    /// Same as the `fval` field
    ///
    /// This method is similar to the `fun` method in `SciPy.optimize` result
    pub fn fun(&self) -> f64 {
        self.fval
    }

    /// Returns the solution point (`Array1<f64>`) in the parameter space
    ///
    /// Same as the `x` field
    /// Returns a clone of the point to avoid moving it
    ///
    /// This method is similar to the `x` method in `SciPy.optimize` result
    pub fn x(&self) -> Array1<f64> {
        self.x.clone()
    }
}

impl fmt::Display for OptimizerResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Objective: {:.8e}", self.fval)?;
        writeln!(f, "Parameters:")?;
        writeln!(f, "  {:.8e}", self.x)?;
        writeln!(f, "Termination: {:?}", self.termination)?;
        write!(
            f,
            "Iterations: {} (fevals: {}, gevals: {})",
            self.n_iter, self.n_fev, self.n_gev
        )?;
        if let Some(time) = self.time {
            write!(f, ", time: {:.3}s", time.as_secs_f64())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Local solver implementation types shipped with the crate
///
/// This enum selects among argmin's local solvers wrapped by
/// [`LocalSolver`](crate::local_solver::runner::LocalSolver).
pub enum LocalSolverType {
    /// L-BFGS local solver
    ///
    /// Requires the objective and a gradient
    LBFGS,

    /// Nelder-Mead local solver
    ///
    /// Requires only the objective
    NelderMead,

    /// Steepest Descent local solver
    ///
    /// Requires the objective and a gradient
    SteepestDescent,
}

impl FromStr for LocalSolverType {
    type Err = &'static str;

    /// Parse a local solver type from a string (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lbfgs" => Ok(Self::LBFGS),
            "nelder-mead" | "neldermead" => Ok(Self::NelderMead),
            "steepestdescent" => Ok(Self::SteepestDescent),
            _ => Err("Invalid solver type."),
        }
    }
}
