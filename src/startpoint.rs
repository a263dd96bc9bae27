//! # Startpoint module
//!
//! This module contains the startpoint methods used to seed the multistart
//! driver: strategies that produce an `n_starts x dim` matrix of initial
//! parameter vectors honoring the box bounds and any user-supplied guesses.
//!
//! Any type implementing [`StartpointMethod`] can be passed to the driver,
//! including plain closures with the matching signature. The shipped
//! methods are [`Uniform`] and [`LatinHypercube`], both seeded for
//! reproducibility.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for startpoint generation
///
/// Any of these aborts the whole batch; no starts can proceed without a
/// well-formed start matrix.
pub enum StartpointError {
    /// Error when the bound vectors disagree on the dimension
    #[error("Startpoint Error: lower and upper bounds disagree on dimension ({lb} vs {ub}).")]
    DimensionMismatch { lb: usize, ub: usize },

    /// Error when a lower bound exceeds its upper bound
    #[error("Startpoint Error: lower bound exceeds upper bound at index {0}.")]
    InvertedBounds(usize),

    /// Error when the guess matrix does not match the problem dimension
    #[error("Startpoint Error: initial guess matrix has {got} columns, expected {expected}.")]
    GuessShape { expected: usize, got: usize },

    /// Error raised by a custom sampler
    #[error("Startpoint Error: {0}")]
    Sampler(String),
}

/// Trait for startpoint generation strategies
///
/// Contract: the returned matrix has exactly `n_starts` rows and `dim`
/// columns, and every row lies within `[lb, ub]` elementwise. A method may
/// be stateful but must be safely re-invocable once per driver run.
///
/// Closures of the matching signature implement this trait, so a one-off
/// sampler does not need a named type.
pub trait StartpointMethod {
    /// Produce the start matrix for a batch of `n_starts` runs
    fn sample(
        &self,
        n_starts: usize,
        lb: &Array1<f64>,
        ub: &Array1<f64>,
        x_guesses: &Array2<f64>,
    ) -> Result<Array2<f64>, StartpointError>;
}

impl<F> StartpointMethod for F
where
    F: Fn(usize, &Array1<f64>, &Array1<f64>, &Array2<f64>) -> Result<Array2<f64>, StartpointError>,
{
    fn sample(
        &self,
        n_starts: usize,
        lb: &Array1<f64>,
        ub: &Array1<f64>,
        x_guesses: &Array2<f64>,
    ) -> Result<Array2<f64>, StartpointError> {
        self(n_starts, lb, ub, x_guesses)
    }
}

/// Validate the sampling domain and return its dimension
fn check_domain(
    lb: &Array1<f64>,
    ub: &Array1<f64>,
    x_guesses: &Array2<f64>,
) -> Result<usize, StartpointError> {
    if lb.len() != ub.len() {
        return Err(StartpointError::DimensionMismatch {
            lb: lb.len(),
            ub: ub.len(),
        });
    }
    for (i, (l, u)) in lb.iter().zip(ub.iter()).enumerate() {
        if l > u {
            return Err(StartpointError::InvertedBounds(i));
        }
    }
    if x_guesses.nrows() > 0 && x_guesses.ncols() != lb.len() {
        return Err(StartpointError::GuessShape {
            expected: lb.len(),
            got: x_guesses.ncols(),
        });
    }
    Ok(lb.len())
}

/// Copy user guesses into the leading rows of the start matrix
///
/// Returns the number of rows taken; guesses beyond `n_starts` are ignored.
fn place_guesses(matrix: &mut Array2<f64>, x_guesses: &Array2<f64>) -> usize {
    let taken = x_guesses.nrows().min(matrix.nrows());
    for j in 0..taken {
        matrix.row_mut(j).assign(&x_guesses.row(j));
    }
    taken
}

#[derive(Debug, Clone)]
/// Uniform random startpoints
///
/// Draws each remaining coordinate uniformly from `[lb[i], ub[i]]` after
/// placing the user guesses in the leading rows. A pinned coordinate
/// (`lb[i] == ub[i]`) collapses to that constant.
pub struct Uniform {
    seed: u64,
}

impl Uniform {
    /// Create a uniform startpoint method with the given RNG seed
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl StartpointMethod for Uniform {
    fn sample(
        &self,
        n_starts: usize,
        lb: &Array1<f64>,
        ub: &Array1<f64>,
        x_guesses: &Array2<f64>,
    ) -> Result<Array2<f64>, StartpointError> {
        let dim = check_domain(lb, ub, x_guesses)?;
        let mut matrix = Array2::zeros((n_starts, dim));
        let taken = place_guesses(&mut matrix, x_guesses);

        let mut rng = StdRng::seed_from_u64(self.seed);
        for j in taken..n_starts {
            for i in 0..dim {
                matrix[[j, i]] = rng.random_range(lb[i]..=ub[i]);
            }
        }
        Ok(matrix)
    }
}

#[derive(Debug, Clone)]
/// Latin hypercube startpoints
///
/// Splits each coordinate range into as many strata as there are sampled
/// rows and draws exactly one point per stratum, with the strata assigned
/// to rows in shuffled order per dimension. Covers the box more evenly
/// than the same number of independent uniform draws.
pub struct LatinHypercube {
    seed: u64,
}

impl LatinHypercube {
    /// Create a Latin hypercube startpoint method with the given RNG seed
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl StartpointMethod for LatinHypercube {
    fn sample(
        &self,
        n_starts: usize,
        lb: &Array1<f64>,
        ub: &Array1<f64>,
        x_guesses: &Array2<f64>,
    ) -> Result<Array2<f64>, StartpointError> {
        let dim = check_domain(lb, ub, x_guesses)?;
        let mut matrix = Array2::zeros((n_starts, dim));
        let taken = place_guesses(&mut matrix, x_guesses);

        let sampled = n_starts - taken;
        if sampled == 0 {
            return Ok(matrix);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        for i in 0..dim {
            let width = (ub[i] - lb[i]) / sampled as f64;
            let mut strata: Vec<usize> = (0..sampled).collect();
            strata.shuffle(&mut rng);
            for (r, stratum) in strata.into_iter().enumerate() {
                let u: f64 = rng.random();
                matrix[[taken + r, i]] = lb[i] + (stratum as f64 + u) * width;
            }
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests_startpoint {
    use super::*;
    use crate::problem::VariableBounds;
    use ndarray::array;

    fn bounds() -> (Array1<f64>, Array1<f64>) {
        (array![-3.0, -2.0, 1.5], array![3.0, 2.0, 1.5])
    }

    fn no_guesses() -> Array2<f64> {
        Array2::zeros((0, 3))
    }

    #[test]
    /// Test that uniform samples respect the bounds, including a pinned
    /// coordinate with lb == ub
    fn test_uniform_within_bounds() {
        let (lb, ub) = bounds();
        let matrix = Uniform::new(7)
            .sample(50, &lb, &ub, &no_guesses())
            .unwrap();
        assert_eq!(matrix.nrows(), 50);
        assert_eq!(matrix.ncols(), 3);

        let vb = VariableBounds {
            lower: lb,
            upper: ub,
        };
        for row in matrix.rows() {
            assert!(vb.contains(&row.to_owned()));
            assert_eq!(row[2], 1.5);
        }
    }

    #[test]
    /// Test that the same seed reproduces the same start matrix
    fn test_uniform_seed_reproducible() {
        let (lb, ub) = bounds();
        let a = Uniform::new(3).sample(10, &lb, &ub, &no_guesses()).unwrap();
        let b = Uniform::new(3).sample(10, &lb, &ub, &no_guesses()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    /// Test that user guesses occupy the leading rows unchanged
    fn test_uniform_guesses_first() {
        let (lb, ub) = bounds();
        let guesses = array![[0.5, 0.5, 1.5], [-1.0, 1.0, 1.5]];
        let matrix = Uniform::new(0).sample(5, &lb, &ub, &guesses).unwrap();
        assert_eq!(matrix.row(0), guesses.row(0));
        assert_eq!(matrix.row(1), guesses.row(1));
    }

    #[test]
    /// Test that guesses beyond n_starts are ignored
    fn test_excess_guesses_ignored() {
        let (lb, ub) = bounds();
        let guesses = array![[0.0, 0.0, 1.5], [1.0, 1.0, 1.5], [2.0, -1.0, 1.5]];
        let matrix = Uniform::new(0).sample(2, &lb, &ub, &guesses).unwrap();
        assert_eq!(matrix.nrows(), 2);
        assert_eq!(matrix.row(0), guesses.row(0));
        assert_eq!(matrix.row(1), guesses.row(1));
    }

    #[test]
    /// Test that Latin hypercube samples respect the bounds and place
    /// exactly one sample per stratum in each dimension
    fn test_latin_hypercube_stratified() {
        let (lb, ub) = bounds();
        let n = 8;
        let matrix = LatinHypercube::new(11)
            .sample(n, &lb, &ub, &no_guesses())
            .unwrap();

        let vb = VariableBounds {
            lower: lb.clone(),
            upper: ub.clone(),
        };
        for row in matrix.rows() {
            assert!(vb.contains(&row.to_owned()));
        }

        // Each of the n strata of each non-degenerate dimension holds one sample.
        for i in 0..2 {
            let width = (ub[i] - lb[i]) / n as f64;
            let mut seen = vec![false; n];
            for j in 0..n {
                let stratum = ((matrix[[j, i]] - lb[i]) / width).floor() as usize;
                assert!(!seen[stratum.min(n - 1)]);
                seen[stratum.min(n - 1)] = true;
            }
        }
    }

    #[test]
    /// Test Latin hypercube sampling when guesses fill the whole batch
    fn test_latin_hypercube_all_guesses() {
        let (lb, ub) = bounds();
        let guesses = array![[0.0, 0.0, 1.5], [1.0, 1.0, 1.5]];
        let matrix = LatinHypercube::new(0).sample(2, &lb, &ub, &guesses).unwrap();
        assert_eq!(matrix, guesses);
    }

    #[test]
    /// Test that mismatched bound vectors are rejected
    fn test_dimension_mismatch() {
        let lb = array![0.0, 0.0];
        let ub = array![1.0];
        let result = Uniform::new(0).sample(3, &lb, &ub, &Array2::zeros((0, 2)));
        assert!(matches!(
            result,
            Err(StartpointError::DimensionMismatch { lb: 2, ub: 1 })
        ));
    }

    #[test]
    /// Test that inverted bounds are rejected with the offending index
    fn test_inverted_bounds() {
        let lb = array![0.0, 2.0];
        let ub = array![1.0, 1.0];
        let result = Uniform::new(0).sample(3, &lb, &ub, &Array2::zeros((0, 2)));
        assert!(matches!(result, Err(StartpointError::InvertedBounds(1))));
    }

    #[test]
    /// Test that a guess matrix of the wrong width is rejected
    fn test_guess_shape_mismatch() {
        let lb = array![0.0, 0.0];
        let ub = array![1.0, 1.0];
        let guesses = array![[0.5, 0.5, 0.5]];
        let result = Uniform::new(0).sample(3, &lb, &ub, &guesses);
        assert!(matches!(
            result,
            Err(StartpointError::GuessShape {
                expected: 2,
                got: 3
            })
        ));
    }

    #[test]
    /// Test that a closure works as a custom startpoint method
    fn test_closure_startpoint_method() {
        let center = |n: usize,
                      lb: &Array1<f64>,
                      ub: &Array1<f64>,
                      _guesses: &Array2<f64>|
         -> Result<Array2<f64>, StartpointError> {
            let mid = (lb + ub) / 2.0;
            let mut matrix = Array2::zeros((n, lb.len()));
            for mut row in matrix.rows_mut() {
                row.assign(&mid);
            }
            Ok(matrix)
        };

        let (lb, ub) = bounds();
        let matrix = center.sample(2, &lb, &ub, &no_guesses()).unwrap();
        assert_eq!(matrix.row(0), array![0.0, 0.0, 1.5]);
        assert_eq!(matrix.row(1), array![0.0, 0.0, 1.5]);
    }
}
