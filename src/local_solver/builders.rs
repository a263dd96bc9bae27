//! # Local Solver Builders module.
//!
//! This module contains the builders used to create and configure the
//! local solvers shipped with the crate: L-BFGS, Nelder-Mead and Steepest
//! Descent, plus the line search methods the gradient-based ones use.
//!
//! ## Example
//! ```rust
//! use multistart::local_solver::builders::{HagerZhangBuilder, LBFGSBuilder};
//!
//! // L-BFGS local solver configuration
//! let lbfgs = LBFGSBuilder::default()
//!             .max_iter(500)
//!             .tolerance_grad(1e-8)
//!             .build();
//!
//! // Hager-Zhang line search configuration
//! let hager_zhang = HagerZhangBuilder::default()
//!                     .delta(0.1)
//!                     .sigma(0.9)
//!                     .build();
//! ```

use ndarray::{array, Array1};

#[derive(Debug, Clone)]
/// Local solver configuration
///
/// This enum holds the configuration options for the local solver used by
/// the multistart driver, depending on the method selected.
pub enum LocalSolverConfig {
    LBFGS {
        /// Maximum number of iterations for the L-BFGS local solver
        max_iter: u64,
        /// Tolerance for the gradient
        tolerance_grad: f64,
        /// Tolerance for the cost function
        tolerance_cost: f64,
        /// Number of previous iterations to store in the history
        history_size: usize,
        /// Line search parameters for the L-BFGS local solver
        line_search_params: LineSearchParams,
    },
    NelderMead {
        /// Step size used to generate the initial simplex from a start point
        ///
        /// The start point becomes the first vertex; each further vertex
        /// offsets one coordinate of the start point by this amount.
        simplex_delta: f64,
        /// Sample standard deviation tolerance
        sd_tolerance: f64,
        /// Maximum number of iterations for the Nelder-Mead local solver
        max_iter: u64,
        /// Reflection coefficient
        alpha: f64,
        /// Expansion coefficient
        gamma: f64,
        /// Contraction coefficient
        rho: f64,
        /// Shrinkage coefficient
        sigma: f64,
    },
    SteepestDescent {
        /// Maximum number of iterations for the Steepest Descent local solver
        max_iter: u64,
        /// Line search parameters for the Steepest Descent local solver
        line_search_params: LineSearchParams,
    },
}

impl LocalSolverConfig {
    pub fn lbfgs() -> LBFGSBuilder {
        LBFGSBuilder::default()
    }

    pub fn neldermead() -> NelderMeadBuilder {
        NelderMeadBuilder::default()
    }

    pub fn steepestdescent() -> SteepestDescentBuilder {
        SteepestDescentBuilder::default()
    }
}

#[derive(Debug, Clone)]
/// L-BFGS builder struct
///
/// This struct allows for the configuration of the L-BFGS local solver.
pub struct LBFGSBuilder {
    max_iter: u64,
    tolerance_grad: f64,
    tolerance_cost: f64,
    history_size: usize,
    line_search_params: LineSearchParams,
}

impl LBFGSBuilder {
    /// Create a new L-BFGS builder
    pub fn new(
        max_iter: u64,
        tolerance_grad: f64,
        tolerance_cost: f64,
        history_size: usize,
        line_search_params: LineSearchParams,
    ) -> Self {
        LBFGSBuilder {
            max_iter,
            tolerance_grad,
            tolerance_cost,
            history_size,
            line_search_params,
        }
    }

    /// Build the L-BFGS local solver configuration
    pub fn build(self) -> LocalSolverConfig {
        LocalSolverConfig::LBFGS {
            max_iter: self.max_iter,
            tolerance_grad: self.tolerance_grad,
            tolerance_cost: self.tolerance_cost,
            history_size: self.history_size,
            line_search_params: self.line_search_params,
        }
    }

    /// Set the maximum number of iterations for the L-BFGS local solver
    pub fn max_iter(mut self, max_iter: u64) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the tolerance for the gradient
    pub fn tolerance_grad(mut self, tolerance_grad: f64) -> Self {
        self.tolerance_grad = tolerance_grad;
        self
    }

    /// Set the tolerance for the cost function
    pub fn tolerance_cost(mut self, tolerance_cost: f64) -> Self {
        self.tolerance_cost = tolerance_cost;
        self
    }

    /// Set the number of previous iterations to store in the history
    pub fn history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        self
    }

    /// Set the line search parameters for the L-BFGS local solver
    pub fn line_search_params(mut self, line_search_params: LineSearchParams) -> Self {
        self.line_search_params = line_search_params;
        self
    }
}

/// Default values for the L-BFGS builder
///
/// - `max_iter`: 300
/// - `tolerance_grad`: sqrt(EPSILON)
/// - `tolerance_cost`: EPSILON
/// - `history_size`: 10
/// - `line_search_params`: Default LineSearchParams
impl Default for LBFGSBuilder {
    fn default() -> Self {
        LBFGSBuilder {
            max_iter: 300,
            tolerance_grad: f64::EPSILON.sqrt(),
            tolerance_cost: f64::EPSILON,
            history_size: 10,
            line_search_params: LineSearchParams::default(),
        }
    }
}

#[derive(Debug, Clone)]
/// Nelder-Mead builder struct
///
/// This struct allows for the configuration of the Nelder-Mead local
/// solver, including the simplex delta, the sample standard deviation
/// tolerance and the reflection, expansion, contraction and shrinkage
/// coefficients.
pub struct NelderMeadBuilder {
    simplex_delta: f64,
    sd_tolerance: f64,
    max_iter: u64,
    alpha: f64,
    gamma: f64,
    rho: f64,
    sigma: f64,
}

impl NelderMeadBuilder {
    /// Create a new Nelder-Mead builder
    pub fn new(
        simplex_delta: f64,
        sd_tolerance: f64,
        max_iter: u64,
        alpha: f64,
        gamma: f64,
        rho: f64,
        sigma: f64,
    ) -> Self {
        NelderMeadBuilder {
            simplex_delta,
            sd_tolerance,
            max_iter,
            alpha,
            gamma,
            rho,
            sigma,
        }
    }

    /// Build the Nelder-Mead local solver configuration
    pub fn build(self) -> LocalSolverConfig {
        LocalSolverConfig::NelderMead {
            simplex_delta: self.simplex_delta,
            sd_tolerance: self.sd_tolerance,
            max_iter: self.max_iter,
            alpha: self.alpha,
            gamma: self.gamma,
            rho: self.rho,
            sigma: self.sigma,
        }
    }

    /// Set the simplex delta parameter
    pub fn simplex_delta(mut self, simplex_delta: f64) -> Self {
        self.simplex_delta = simplex_delta;
        self
    }

    /// Set the sample standard deviation tolerance
    pub fn sd_tolerance(mut self, sd_tolerance: f64) -> Self {
        self.sd_tolerance = sd_tolerance;
        self
    }

    /// Set the maximum number of iterations for the Nelder-Mead local solver
    pub fn max_iter(mut self, max_iter: u64) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the reflection coefficient
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the expansion coefficient
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the contraction coefficient
    pub fn rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    /// Set the shrinkage coefficient
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }
}

/// Default values for the Nelder-Mead builder
///
/// - `simplex_delta`: 0.1
/// - `sd_tolerance`: EPSILON
/// - `max_iter`: 300
/// - `alpha`: 1.0
/// - `gamma`: 2.0
/// - `rho`: 0.5
/// - `sigma`: 0.5
impl Default for NelderMeadBuilder {
    fn default() -> Self {
        NelderMeadBuilder {
            simplex_delta: 0.1,
            sd_tolerance: f64::EPSILON,
            max_iter: 300,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
        }
    }
}

#[derive(Debug, Clone)]
/// Steepest Descent builder struct
///
/// This struct allows for the configuration of the Steepest Descent local
/// solver, including the maximum number of iterations and the line search
/// parameters.
pub struct SteepestDescentBuilder {
    max_iter: u64,
    line_search_params: LineSearchParams,
}

impl SteepestDescentBuilder {
    /// Create a new Steepest Descent builder
    pub fn new(max_iter: u64, line_search_params: LineSearchParams) -> Self {
        SteepestDescentBuilder {
            max_iter,
            line_search_params,
        }
    }

    /// Build the Steepest Descent local solver configuration
    pub fn build(self) -> LocalSolverConfig {
        LocalSolverConfig::SteepestDescent {
            max_iter: self.max_iter,
            line_search_params: self.line_search_params,
        }
    }

    /// Set the maximum number of iterations for the Steepest Descent local solver
    pub fn max_iter(mut self, max_iter: u64) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the line search parameters for the Steepest Descent local solver
    pub fn line_search_params(mut self, line_search_params: LineSearchParams) -> Self {
        self.line_search_params = line_search_params;
        self
    }
}

/// Default values for the Steepest Descent builder
///
/// - `max_iter`: 300
/// - `line_search_params`: Default LineSearchParams
impl Default for SteepestDescentBuilder {
    fn default() -> Self {
        SteepestDescentBuilder {
            max_iter: 300,
            line_search_params: LineSearchParams::default(),
        }
    }
}

#[derive(Debug, Clone)]
/// Line search methods for the local solver
///
/// This enum holds the line search methods available to the gradient-based
/// local solvers: More-Thuente and Hager-Zhang.
pub enum LineSearchMethod {
    MoreThuente {
        c1: f64,
        c2: f64,
        width_tolerance: f64,
        bounds: Array1<f64>,
    },
    HagerZhang {
        delta: f64,
        sigma: f64,
        epsilon: f64,
        theta: f64,
        gamma: f64,
        eta: f64,
        bounds: Array1<f64>,
    },
}

#[derive(Debug, Clone)]
/// Line search parameters for the local solver
///
/// Only needed for the local solvers that use a line search method.
pub struct LineSearchParams {
    pub method: LineSearchMethod,
}

impl LineSearchParams {
    pub fn morethuente() -> MoreThuenteBuilder {
        MoreThuenteBuilder::default()
    }

    pub fn hagerzhang() -> HagerZhangBuilder {
        HagerZhangBuilder::default()
    }
}

/// Default line search parameters: More-Thuente with
///
/// - `c1`: 1e-4
/// - `c2`: 0.9
/// - `width_tolerance`: 1e-10
/// - `bounds`: [sqrt(EPSILON), INFINITY]
impl Default for LineSearchParams {
    fn default() -> Self {
        LineSearchParams {
            method: LineSearchMethod::MoreThuente {
                c1: 1e-4,
                c2: 0.9,
                width_tolerance: 1e-10,
                bounds: array![f64::EPSILON.sqrt(), f64::INFINITY],
            },
        }
    }
}

#[derive(Debug, Clone)]
/// More-Thuente builder struct
///
/// This struct allows for the configuration of the More-Thuente line
/// search method, including the strong Wolfe conditions parameters c1 and
/// c2, the width tolerance and the bounds.
pub struct MoreThuenteBuilder {
    c1: f64,
    c2: f64,
    width_tolerance: f64,
    bounds: Array1<f64>,
}

impl MoreThuenteBuilder {
    /// Create a new More-Thuente builder
    pub fn new(c1: f64, c2: f64, width_tolerance: f64, bounds: Array1<f64>) -> Self {
        MoreThuenteBuilder {
            c1,
            c2,
            width_tolerance,
            bounds,
        }
    }

    /// Build the More-Thuente line search parameters
    pub fn build(self) -> LineSearchParams {
        LineSearchParams {
            method: LineSearchMethod::MoreThuente {
                c1: self.c1,
                c2: self.c2,
                width_tolerance: self.width_tolerance,
                bounds: self.bounds,
            },
        }
    }

    /// Set the strong Wolfe conditions parameter c1
    pub fn c1(mut self, c1: f64) -> Self {
        self.c1 = c1;
        self
    }

    /// Set the strong Wolfe conditions parameter c2
    pub fn c2(mut self, c2: f64) -> Self {
        self.c2 = c2;
        self
    }

    /// Set the width tolerance
    pub fn width_tolerance(mut self, width_tolerance: f64) -> Self {
        self.width_tolerance = width_tolerance;
        self
    }

    /// Set the bounds
    pub fn bounds(mut self, bounds: Array1<f64>) -> Self {
        self.bounds = bounds;
        self
    }
}

/// Default values for the More-Thuente builder
///
/// - `c1`: 1e-4
/// - `c2`: 0.9
/// - `width_tolerance`: 1e-10
/// - `bounds`: [sqrt(EPSILON), INFINITY]
impl Default for MoreThuenteBuilder {
    fn default() -> Self {
        MoreThuenteBuilder {
            c1: 1e-4,
            c2: 0.9,
            width_tolerance: 1e-10,
            bounds: array![f64::EPSILON.sqrt(), f64::INFINITY],
        }
    }
}

#[derive(Debug, Clone)]
/// Hager-Zhang builder struct
///
/// This struct allows for the configuration of the Hager-Zhang line search
/// method, including delta, sigma, epsilon, theta, gamma, eta and the
/// bounds.
pub struct HagerZhangBuilder {
    delta: f64,
    sigma: f64,
    epsilon: f64,
    theta: f64,
    gamma: f64,
    eta: f64,
    bounds: Array1<f64>,
}

impl HagerZhangBuilder {
    /// Create a new Hager-Zhang builder
    pub fn new(
        delta: f64,
        sigma: f64,
        epsilon: f64,
        theta: f64,
        gamma: f64,
        eta: f64,
        bounds: Array1<f64>,
    ) -> Self {
        HagerZhangBuilder {
            delta,
            sigma,
            epsilon,
            theta,
            gamma,
            eta,
            bounds,
        }
    }

    /// Build the Hager-Zhang line search parameters
    pub fn build(self) -> LineSearchParams {
        LineSearchParams {
            method: LineSearchMethod::HagerZhang {
                delta: self.delta,
                sigma: self.sigma,
                epsilon: self.epsilon,
                theta: self.theta,
                gamma: self.gamma,
                eta: self.eta,
                bounds: self.bounds,
            },
        }
    }

    /// Set the delta parameter
    pub fn delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    /// Set the sigma parameter
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Set the epsilon parameter
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the theta parameter
    pub fn theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// Set the gamma parameter
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the eta parameter
    pub fn eta(mut self, eta: f64) -> Self {
        self.eta = eta;
        self
    }

    /// Set the bounds
    pub fn bounds(mut self, bounds: Array1<f64>) -> Self {
        self.bounds = bounds;
        self
    }
}

/// Default values for the Hager-Zhang builder
///
/// - `delta`: 0.1
/// - `sigma`: 0.9
/// - `epsilon`: 1e-6
/// - `theta`: 0.5
/// - `gamma`: 0.66
/// - `eta`: 0.01
/// - `bounds`: [EPSILON, 1e5]
impl Default for HagerZhangBuilder {
    fn default() -> Self {
        HagerZhangBuilder {
            delta: 0.1,
            sigma: 0.9,
            epsilon: 1e-6,
            theta: 0.5,
            gamma: 0.66,
            eta: 0.01,
            bounds: array![f64::EPSILON, 1e5],
        }
    }
}
