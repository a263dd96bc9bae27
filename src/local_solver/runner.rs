//! # Local Solver Runner module
//!
//! This module contains the argmin-backed implementation of the
//! [`LocalOptimizer`](crate::local_solver::LocalOptimizer) capability.
//!
//! ## Local Solvers
//!
//! The local solvers currently supported are:
//!  - L-BFGS: Requires gradient and linesearch
//!  - Nelder-Mead: Only requires the objective function
//!  - Steepest Descent: Requires gradient and linesearch
//!
//! The solvers are unconstrained; the box bounds of the problem only steer
//! the startpoint sampling, so a run may leave the box. Guide solutions
//! back with a penalty term in the objective if that matters for your
//! model.

use crate::local_solver::builders::{LineSearchMethod, LocalSolverConfig};
use crate::local_solver::LocalOptimizer;
use crate::problem::Problem;
use crate::types::{LocalSolverType, OptimizerResult};
use argmin::core::{
    CostFunction, Error, Executor, Gradient, IterState, OptimizationResult, Solver, State,
};
use argmin::solver::{
    gradientdescent::SteepestDescent,
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    neldermead::NelderMead,
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::time::Instant;
use thiserror::Error as ErrorDerive;

#[cfg(feature = "obs_slog")]
use argmin::core::observers::ObserverMode;
#[cfg(feature = "obs_slog")]
use argmin_observer_slog::SlogLogger;

/// Solver state for the gradient-based local solvers
type GradientState = IterState<Array1<f64>, Array1<f64>, (), (), (), f64>;

/// Solver state for the simplex-based Nelder-Mead solver
type SimplexState = IterState<Array1<f64>, (), (), (), (), f64>;

#[derive(ErrorDerive, Debug, PartialEq)]
/// Local solver error enum
pub enum LocalSolverError {
    #[error("Local Solver Error: Invalid LocalSolverConfig for L-BFGS solver. {0}")]
    InvalidLBFGSConfig(String),

    #[error("Local Solver Error: Invalid LocalSolverConfig for Nelder-Mead solver. {0}")]
    InvalidNelderMeadConfig(String),

    #[error("Local Solver Error: Invalid LocalSolverConfig for Steepest Descent solver. {0}")]
    InvalidSteepestDescentConfig(String),

    #[error("Local Solver Error: Failed to run local solver. {0}")]
    RunFailed(String),

    #[error("Local Solver Error: No solution found")]
    NoSolution,
}

/// Adapter exposing a [`Problem`] to argmin's solver traits
struct ObjectiveCost<'a, P: Problem> {
    problem: &'a P,
}

impl<P: Problem> CostFunction for ObjectiveCost<'_, P> {
    type Param = Array1<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, Error> {
        self.problem
            .objective(param)
            .map_err(|e| Error::msg(e.to_string()))
    }
}

impl<P: Problem> Gradient for ObjectiveCost<'_, P> {
    type Param = Array1<f64>;
    type Gradient = Array1<f64>;

    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, Error> {
        self.problem
            .gradient(param)
            .map_err(|e| Error::msg(e.to_string()))
    }
}

/// # Local solver struct
///
/// The argmin-backed local optimizer handed to the multistart driver. It
/// pairs a [`LocalSolverType`] with the matching [`LocalSolverConfig`] and
/// runs one argmin executor per [`minimize`](LocalOptimizer::minimize)
/// call, translating the terminal solver state into an
/// [`OptimizerResult`].
///
/// The struct is stateless across calls, so one instance serves a whole
/// multistart batch (and may be shared across threads under the `rayon`
/// feature).
pub struct LocalSolver {
    local_solver_type: LocalSolverType,
    local_solver_config: LocalSolverConfig,
    #[cfg(feature = "obs_slog")]
    verbose: bool,
}

impl LocalSolver {
    pub fn new(local_solver_type: LocalSolverType, local_solver_config: LocalSolverConfig) -> Self {
        Self {
            local_solver_type,
            local_solver_config,
            #[cfg(feature = "obs_slog")]
            verbose: false,
        }
    }

    #[cfg(feature = "obs_slog")]
    /// Attach a slog terminal logger to every solver run
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Wire a configured solver into an executor, run it and translate the
    /// terminal state
    fn run_executor<'a, P, S, St>(
        &self,
        cost: ObjectiveCost<'a, P>,
        solver: S,
        configure: impl FnOnce(St) -> St,
        x0: &Array1<f64>,
        started: Instant,
    ) -> Result<OptimizerResult, LocalSolverError>
    where
        P: Problem,
        S: Solver<ObjectiveCost<'a, P>, St>,
        St: State<Param = Array1<f64>, Float = f64>,
    {
        let mut executor = Executor::new(cost, solver);
        executor = executor.configure(configure);

        #[cfg(feature = "obs_slog")]
        if self.verbose {
            executor = executor.add_observer(SlogLogger::term_noblock(), ObserverMode::Always);
        }

        let res = executor
            .run()
            .map_err(|e: Error| LocalSolverError::RunFailed(e.to_string()))?;
        finalize(res, x0, started)
    }

    /// Solve with the L-BFGS local solver
    fn solve_lbfgs<P: Problem>(
        &self,
        problem: &P,
        x0: &Array1<f64>,
        started: Instant,
    ) -> Result<OptimizerResult, LocalSolverError> {
        let cost = ObjectiveCost { problem };

        if let LocalSolverConfig::LBFGS {
            max_iter,
            tolerance_grad,
            tolerance_cost,
            history_size,
            line_search_params,
        } = &self.local_solver_config
        {
            match &line_search_params.method {
                LineSearchMethod::MoreThuente {
                    c1,
                    c2,
                    width_tolerance,
                    bounds,
                } => {
                    let linesearch = MoreThuenteLineSearch::new()
                        .with_c(*c1, *c2)
                        .map_err(|e: Error| LocalSolverError::InvalidLBFGSConfig(e.to_string()))?
                        .with_bounds(bounds[0], bounds[1])
                        .map_err(|e: Error| LocalSolverError::InvalidLBFGSConfig(e.to_string()))?
                        .with_width_tolerance(*width_tolerance)
                        .map_err(|e: Error| LocalSolverError::InvalidLBFGSConfig(e.to_string()))?;

                    let solver = LBFGS::new(linesearch, *history_size)
                        .with_tolerance_cost(*tolerance_cost)
                        .map_err(|e: Error| LocalSolverError::InvalidLBFGSConfig(e.to_string()))?
                        .with_tolerance_grad(*tolerance_grad)
                        .map_err(|e: Error| LocalSolverError::InvalidLBFGSConfig(e.to_string()))?;

                    self.run_executor(
                        cost,
                        solver,
                        |state: GradientState| state.param(x0.clone()).max_iters(*max_iter),
                        x0,
                        started,
                    )
                }
                LineSearchMethod::HagerZhang {
                    delta,
                    sigma,
                    epsilon,
                    theta,
                    gamma,
                    eta,
                    bounds,
                } => {
                    let linesearch = HagerZhangLineSearch::new()
                        .with_delta_sigma(*delta, *sigma)
                        .map_err(|e: Error| LocalSolverError::InvalidLBFGSConfig(e.to_string()))?
                        .with_epsilon(*epsilon)
                        .map_err(|e: Error| LocalSolverError::InvalidLBFGSConfig(e.to_string()))?
                        .with_theta(*theta)
                        .map_err(|e: Error| LocalSolverError::InvalidLBFGSConfig(e.to_string()))?
                        .with_gamma(*gamma)
                        .map_err(|e: Error| LocalSolverError::InvalidLBFGSConfig(e.to_string()))?
                        .with_eta(*eta)
                        .map_err(|e: Error| LocalSolverError::InvalidLBFGSConfig(e.to_string()))?
                        .with_bounds(bounds[0], bounds[1])
                        .map_err(|e: Error| LocalSolverError::InvalidLBFGSConfig(e.to_string()))?;

                    let solver = LBFGS::new(linesearch, *history_size)
                        .with_tolerance_cost(*tolerance_cost)
                        .map_err(|e: Error| LocalSolverError::InvalidLBFGSConfig(e.to_string()))?
                        .with_tolerance_grad(*tolerance_grad)
                        .map_err(|e: Error| LocalSolverError::InvalidLBFGSConfig(e.to_string()))?;

                    self.run_executor(
                        cost,
                        solver,
                        |state: GradientState| state.param(x0.clone()).max_iters(*max_iter),
                        x0,
                        started,
                    )
                }
            }
        } else {
            Err(LocalSolverError::InvalidLBFGSConfig(
                "Error parsing solver config".to_string(),
            ))
        }
    }

    /// Solve with the Nelder-Mead local solver
    fn solve_nelder_mead<P: Problem>(
        &self,
        problem: &P,
        x0: &Array1<f64>,
        started: Instant,
    ) -> Result<OptimizerResult, LocalSolverError> {
        let cost = ObjectiveCost { problem };

        if let LocalSolverConfig::NelderMead {
            simplex_delta,
            sd_tolerance,
            max_iter,
            alpha,
            gamma,
            rho,
            sigma,
        } = &self.local_solver_config
        {
            // Generate the initial simplex from the start point
            let mut simplex = vec![x0.clone()];
            for i in 0..x0.len() {
                let mut point = x0.clone();
                point[i] += simplex_delta;
                simplex.push(point);
            }

            let solver = NelderMead::new(simplex)
                .with_sd_tolerance(*sd_tolerance)
                .map_err(|e: Error| LocalSolverError::InvalidNelderMeadConfig(e.to_string()))?
                .with_alpha(*alpha)
                .map_err(|e: Error| LocalSolverError::InvalidNelderMeadConfig(e.to_string()))?
                .with_gamma(*gamma)
                .map_err(|e: Error| LocalSolverError::InvalidNelderMeadConfig(e.to_string()))?
                .with_rho(*rho)
                .map_err(|e: Error| LocalSolverError::InvalidNelderMeadConfig(e.to_string()))?
                .with_sigma(*sigma)
                .map_err(|e: Error| LocalSolverError::InvalidNelderMeadConfig(e.to_string()))?;

            self.run_executor(
                cost,
                solver,
                |state: SimplexState| state.max_iters(*max_iter),
                x0,
                started,
            )
        } else {
            Err(LocalSolverError::InvalidNelderMeadConfig(
                "Error parsing solver config".to_string(),
            ))
        }
    }

    /// Solve with the Steepest Descent local solver
    fn solve_steepest_descent<P: Problem>(
        &self,
        problem: &P,
        x0: &Array1<f64>,
        started: Instant,
    ) -> Result<OptimizerResult, LocalSolverError> {
        let cost = ObjectiveCost { problem };

        if let LocalSolverConfig::SteepestDescent {
            max_iter,
            line_search_params,
        } = &self.local_solver_config
        {
            match &line_search_params.method {
                LineSearchMethod::MoreThuente {
                    c1,
                    c2,
                    width_tolerance,
                    bounds,
                } => {
                    let linesearch = MoreThuenteLineSearch::new()
                        .with_c(*c1, *c2)
                        .map_err(|e: Error| {
                            LocalSolverError::InvalidSteepestDescentConfig(e.to_string())
                        })?
                        .with_bounds(bounds[0], bounds[1])
                        .map_err(|e: Error| {
                            LocalSolverError::InvalidSteepestDescentConfig(e.to_string())
                        })?
                        .with_width_tolerance(*width_tolerance)
                        .map_err(|e: Error| {
                            LocalSolverError::InvalidSteepestDescentConfig(e.to_string())
                        })?;

                    self.run_executor(
                        cost,
                        SteepestDescent::new(linesearch),
                        |state: GradientState| state.param(x0.clone()).max_iters(*max_iter),
                        x0,
                        started,
                    )
                }
                LineSearchMethod::HagerZhang {
                    delta,
                    sigma,
                    epsilon,
                    theta,
                    gamma,
                    eta,
                    bounds,
                } => {
                    let linesearch = HagerZhangLineSearch::new()
                        .with_delta_sigma(*delta, *sigma)
                        .map_err(|e: Error| {
                            LocalSolverError::InvalidSteepestDescentConfig(e.to_string())
                        })?
                        .with_epsilon(*epsilon)
                        .map_err(|e: Error| {
                            LocalSolverError::InvalidSteepestDescentConfig(e.to_string())
                        })?
                        .with_theta(*theta)
                        .map_err(|e: Error| {
                            LocalSolverError::InvalidSteepestDescentConfig(e.to_string())
                        })?
                        .with_gamma(*gamma)
                        .map_err(|e: Error| {
                            LocalSolverError::InvalidSteepestDescentConfig(e.to_string())
                        })?
                        .with_eta(*eta)
                        .map_err(|e: Error| {
                            LocalSolverError::InvalidSteepestDescentConfig(e.to_string())
                        })?
                        .with_bounds(bounds[0], bounds[1])
                        .map_err(|e: Error| {
                            LocalSolverError::InvalidSteepestDescentConfig(e.to_string())
                        })?;

                    self.run_executor(
                        cost,
                        SteepestDescent::new(linesearch),
                        |state: GradientState| state.param(x0.clone()).max_iters(*max_iter),
                        x0,
                        started,
                    )
                }
            }
        } else {
            Err(LocalSolverError::InvalidSteepestDescentConfig(
                "Error parsing solver config".to_string(),
            ))
        }
    }
}

impl<P: Problem> LocalOptimizer<P> for LocalSolver {
    /// Run one local optimization from `x0`
    ///
    /// Selects the solver function based on the configured
    /// [`LocalSolverType`].
    fn minimize(
        &self,
        problem: &P,
        x0: &Array1<f64>,
    ) -> Result<OptimizerResult, LocalSolverError> {
        let started = Instant::now();
        match self.local_solver_type {
            LocalSolverType::LBFGS => self.solve_lbfgs(problem, x0, started),
            LocalSolverType::NelderMead => self.solve_nelder_mead(problem, x0, started),
            LocalSolverType::SteepestDescent => self.solve_steepest_descent(problem, x0, started),
        }
    }
}

/// Translate a terminal argmin state into an [`OptimizerResult`]
fn finalize<Pr, So, St>(
    res: OptimizationResult<Pr, So, St>,
    x0: &Array1<f64>,
    started: Instant,
) -> Result<OptimizerResult, LocalSolverError>
where
    St: State<Param = Array1<f64>, Float = f64>,
{
    let state = res.state();
    let x = state
        .get_best_param()
        .cloned()
        .ok_or(LocalSolverError::NoSolution)?;
    let counts = state.get_func_counts();

    Ok(OptimizerResult {
        x,
        fval: state.get_best_cost(),
        x0: x0.clone(),
        termination: state.get_termination_status().clone(),
        n_iter: state.get_iter(),
        n_fev: counts.get("cost_count").copied().unwrap_or(0),
        n_gev: counts.get("gradient_count").copied().unwrap_or(0),
        time: Some(started.elapsed()),
    })
}

#[cfg(test)]
mod tests_local_solvers {
    use super::*;
    use crate::local_solver::builders::{
        HagerZhangBuilder, LBFGSBuilder, NelderMeadBuilder, SteepestDescentBuilder,
    };
    use crate::types::EvaluationError;
    use approx::assert_relative_eq;
    use argmin::core::TerminationStatus;
    use ndarray::{array, Array2};

    #[derive(Debug, Clone)]
    pub struct NoGradientSixHumpCamel;

    impl Problem for NoGradientSixHumpCamel {
        fn objective(&self, x: &Array1<f64>) -> Result<f64, EvaluationError> {
            Ok(
                (4.0 - 2.1 * x[0].powi(2) + x[0].powi(4) / 3.0) * x[0].powi(2)
                    + x[0] * x[1]
                    + (-4.0 + 4.0 * x[1].powi(2)) * x[1].powi(2),
            )
        }

        fn variable_bounds(&self) -> Array2<f64> {
            array![[-3.0, 3.0], [-2.0, 2.0]]
        }
    }

    #[derive(Debug, Clone)]
    struct Sphere;

    impl Problem for Sphere {
        fn objective(&self, x: &Array1<f64>) -> Result<f64, EvaluationError> {
            Ok(x.iter().map(|xi| xi.powi(2)).sum())
        }

        fn gradient(&self, x: &Array1<f64>) -> Result<Array1<f64>, EvaluationError> {
            Ok(x * 2.0)
        }

        fn variable_bounds(&self) -> Array2<f64> {
            array![[-5.0, 5.0], [-5.0, 5.0]]
        }
    }

    #[test]
    /// Test the Nelder-Mead local solver with a problem that doesn't
    /// have a gradient. Since Nelder-Mead doesn't require a gradient,
    /// the local solver should run without an error.
    fn test_nelder_mead_no_gradient() {
        let solver = LocalSolver::new(
            LocalSolverType::NelderMead,
            NelderMeadBuilder::default().max_iter(1000).build(),
        );

        let x0: Array1<f64> = array![0.0, 0.0];
        let res = solver.minimize(&NoGradientSixHumpCamel, &x0).unwrap();
        assert_relative_eq!(res.fval, -1.0316284534898774, epsilon = 1e-6);
        assert_eq!(res.x0, x0);
        assert!(res.n_fev > 0);
        assert!(res.time.is_some());
    }

    #[test]
    /// Test the L-BFGS local solver with a problem that doesn't
    /// have a gradient. Since L-BFGS requires a gradient,
    /// the local solver should return an error.
    fn test_lbfgs_no_gradient() {
        let solver = LocalSolver::new(
            LocalSolverType::LBFGS,
            LBFGSBuilder::default().build(),
        );

        let x0: Array1<f64> = array![0.0, 0.0];
        let error = solver.minimize(&NoGradientSixHumpCamel, &x0).unwrap_err();
        match error {
            LocalSolverError::RunFailed(msg) => {
                assert!(msg.contains("Gradient not implemented"))
            }
            other => panic!("Expected RunFailed, got {:?}", other),
        }
    }

    #[test]
    /// Test the Steepest Descent local solver with a problem that doesn't
    /// have a gradient. Since Steepest Descent requires a gradient,
    /// the local solver should return an error.
    fn test_steepest_descent_no_gradient() {
        let solver = LocalSolver::new(
            LocalSolverType::SteepestDescent,
            SteepestDescentBuilder::default().build(),
        );

        let x0: Array1<f64> = array![0.0, 0.0];
        let error = solver.minimize(&NoGradientSixHumpCamel, &x0).unwrap_err();
        assert!(matches!(error, LocalSolverError::RunFailed(_)));
    }

    #[test]
    /// Test the L-BFGS local solver on a smooth convex problem with an
    /// analytic gradient
    fn test_lbfgs_sphere_converges() {
        let solver = LocalSolver::new(
            LocalSolverType::LBFGS,
            LBFGSBuilder::default().build(),
        );

        let x0: Array1<f64> = array![2.0, -1.5];
        let res = solver.minimize(&Sphere, &x0).unwrap();
        assert_relative_eq!(res.fval, 0.0, epsilon = 1e-8);
        assert!(matches!(res.termination, TerminationStatus::Terminated(_)));
        assert!(res.n_gev > 0);
    }

    #[test]
    /// Test creating a local solver with an invalid configuration
    /// In this case, for HagerZhangLineSearch, delta must be in (0, 1)
    /// and we set it to 2.0
    fn invalid_hagerzhang() {
        let solver = LocalSolver::new(
            LocalSolverType::LBFGS,
            LBFGSBuilder::default()
                .line_search_params(HagerZhangBuilder::default().delta(2.0).build())
                .build(),
        );

        let x0: Array1<f64> = array![0.0, 0.0];
        let error = solver.minimize(&Sphere, &x0).unwrap_err();
        assert!(matches!(error, LocalSolverError::InvalidLBFGSConfig(_)));
    }

    #[test]
    /// Test that a solver type paired with a mismatched configuration is
    /// rejected before any dispatch
    fn test_config_mismatch() {
        let solver = LocalSolver::new(
            LocalSolverType::LBFGS,
            NelderMeadBuilder::default().build(),
        );

        let x0: Array1<f64> = array![0.0, 0.0];
        let error = solver.minimize(&Sphere, &x0).unwrap_err();
        assert_eq!(
            error,
            LocalSolverError::InvalidLBFGSConfig("Error parsing solver config".to_string())
        );
    }
}
