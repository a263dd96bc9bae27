//! # Optimization problem trait module
//!
//! This module contains the `Problem` trait, which describes the estimation
//! domain: the objective function, optional derivatives, the box bounds of
//! the parameter space, and optional user-supplied initial guesses.
//!
//! ## Example
//! ```rust
//! use multistart::problem::Problem;
//! use multistart::types::EvaluationError;
//! use ndarray::{array, Array1, Array2};
//!
//! #[derive(Debug, Clone)]
//! pub struct OneDGriewank;
//!
//! impl Problem for OneDGriewank {
//!     fn objective(&self, x: &Array1<f64>) -> Result<f64, EvaluationError> {
//!         Ok(1.0 + x[0].powi(2) / 4000.0 - x[0].cos())
//!     }
//!
//!     fn gradient(&self, x: &Array1<f64>) -> Result<Array1<f64>, EvaluationError> {
//!         Ok(array![x[0] / 2000.0 + x[0].sin()])
//!     }
//!
//!     fn variable_bounds(&self) -> Array2<f64> {
//!         array![[-600.0, 600.0]]
//!     }
//! }
//! ```

use crate::types::EvaluationError;
use ndarray::{Array1, Array2};

/// Trait for parameter-estimation problems
///
/// This trait defines the methods an estimation problem must implement:
/// the objective function, optionally its gradient and hessian, the
/// variable bounds, and optionally a set of initial guesses.
///
/// The driver treats the problem as read-only for the duration of a run.
pub trait Problem {
    /// Objective function to minimize, given at point x (`Array1<f64>`)
    ///
    /// Returns a `Result<f64, EvaluationError>` of the value of the
    /// objective function at x. Implementations backed by a numerical
    /// simulator should map simulator breakdowns to an error rather than
    /// panic; the driver recovers from failed starts.
    fn objective(&self, x: &Array1<f64>) -> Result<f64, EvaluationError>;

    /// Gradient of the objective function at point x (`Array1<f64>`)
    ///
    /// The default implementation returns an error indicating the gradient
    /// is not implemented in case it is needed
    fn gradient(&self, _x: &Array1<f64>) -> Result<Array1<f64>, EvaluationError> {
        Err(EvaluationError::GradientNotImplemented)
    }

    /// Hessian of the objective function at point x (`Array2<f64>`)
    ///
    /// The default implementation returns an error indicating the hessian
    /// is not implemented in case it is needed
    fn hessian(&self, _x: &Array1<f64>) -> Result<Array2<f64>, EvaluationError> {
        Err(EvaluationError::HessianNotImplemented)
    }

    /// Variable bounds for the estimation problem
    ///
    /// Returns an `Array2<f64>` with one row per parameter holding
    /// `[lower, upper]`. A row with `lower == upper` is legal and pins that
    /// parameter to a constant.
    fn variable_bounds(&self) -> Array2<f64>;

    /// User-supplied initial guesses, one row per guess
    ///
    /// Startpoint methods place these in the leading rows of the start
    /// matrix before sampling the remainder. The default is no guesses
    /// (an empty `0 x dim` matrix). Each row must lie within the bounds.
    fn initial_guesses(&self) -> Array2<f64> {
        Array2::zeros((0, self.dim()))
    }

    /// Number of parameters of the problem
    fn dim(&self) -> usize {
        self.variable_bounds().nrows()
    }
}

/// Struct to hold the bounds of the variables
///
/// Splits the `dim x 2` bounds matrix of a [`Problem`] into separate lower
/// and upper vectors, the form the startpoint methods consume.
#[derive(Debug, Clone)]
pub struct VariableBounds {
    pub lower: Array1<f64>,
    pub upper: Array1<f64>,
}

impl VariableBounds {
    /// Extract the bounds of a problem into lower/upper vectors
    pub fn from_problem<P: Problem>(problem: &P) -> Self {
        let bounds = problem.variable_bounds();
        Self {
            lower: bounds.column(0).to_owned(),
            upper: bounds.column(1).to_owned(),
        }
    }

    /// Number of parameters covered by the bounds
    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    /// Check that a point lies within the bounds elementwise
    pub fn contains(&self, point: &Array1<f64>) -> bool {
        point.len() == self.dim()
            && point
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(x, (lb, ub))| lb <= x && x <= ub)
    }
}

#[cfg(test)]
mod tests_problem {
    use super::*;
    use ndarray::array;

    #[derive(Debug, Clone)]
    struct Sphere;

    impl Problem for Sphere {
        fn objective(&self, x: &Array1<f64>) -> Result<f64, EvaluationError> {
            Ok(x.iter().map(|xi| xi.powi(2)).sum())
        }

        fn variable_bounds(&self) -> Array2<f64> {
            array![[-5.0, 5.0], [-2.0, 2.0], [1.0, 1.0]]
        }
    }

    #[test]
    /// Test that dim is derived from the bounds matrix
    fn test_problem_dim() {
        assert_eq!(Sphere.dim(), 3);
    }

    #[test]
    /// Test that the default initial guesses are an empty 0 x dim matrix
    fn test_default_initial_guesses() {
        let guesses = Sphere.initial_guesses();
        assert_eq!(guesses.nrows(), 0);
        assert_eq!(guesses.ncols(), 3);
    }

    #[test]
    /// Test that the default gradient and hessian signal not-implemented
    fn test_default_derivatives_not_implemented() {
        let x = array![0.0, 0.0, 1.0];
        assert!(matches!(
            Sphere.gradient(&x),
            Err(EvaluationError::GradientNotImplemented)
        ));
        assert!(matches!(
            Sphere.hessian(&x),
            Err(EvaluationError::HessianNotImplemented)
        ));
    }

    #[test]
    /// Test extracting lower/upper vectors from the bounds matrix
    fn test_variable_bounds_from_problem() {
        let bounds = VariableBounds::from_problem(&Sphere);
        assert_eq!(bounds.lower, array![-5.0, -2.0, 1.0]);
        assert_eq!(bounds.upper, array![5.0, 2.0, 1.0]);
        assert_eq!(bounds.dim(), 3);
    }

    #[test]
    /// Test elementwise containment, including a pinned coordinate
    fn test_variable_bounds_contains() {
        let bounds = VariableBounds::from_problem(&Sphere);
        assert!(bounds.contains(&array![0.0, 0.0, 1.0]));
        assert!(!bounds.contains(&array![0.0, 3.0, 1.0]));
        assert!(!bounds.contains(&array![0.0, 0.0, 1.1]));
        assert!(!bounds.contains(&array![0.0, 0.0]));
    }
}
