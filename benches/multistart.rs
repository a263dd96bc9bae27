use criterion::{criterion_group, criterion_main, Criterion};

/// Rosenbrock Function
///
/// $f(x) = (a - x_1)^2 + b (x_2 - x_1^2)^2$ with $a = 1$ and $b = 100$.
///
/// The function has a single global minimum at $f(1, 1) = 0$, lying inside
/// a long, narrow, parabolic valley that makes convergence slow for
/// gradient-based solvers.
///
/// References:
///
/// Molga, M., & Smutnicki, C. Test functions for optimization needs (April 3, 2005), p. 5. Retrieved January 2025, from https://robertmarks.org/Classes/ENGR5358/Papers/functions.pdf
use multistart::local_solver::builders::LBFGSBuilder;
use multistart::local_solver::runner::LocalSolver;
use multistart::optimize::{minimize, MultistartError};
use multistart::problem::Problem;
use multistart::result::MultistartResult;
use multistart::startpoint::LatinHypercube;
use multistart::types::{EvaluationError, LocalSolverType};
use ndarray::{array, Array1, Array2};

#[derive(Debug, Clone)]
pub struct Rosenbrock;

impl Problem for Rosenbrock {
    fn objective(&self, x: &Array1<f64>) -> Result<f64, EvaluationError> {
        Ok((1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2))
    }

    fn gradient(&self, x: &Array1<f64>) -> Result<Array1<f64>, EvaluationError> {
        Ok(array![
            -2.0 * (1.0 - x[0]) - 400.0 * x[0] * (x[1] - x[0].powi(2)),
            200.0 * (x[1] - x[0].powi(2))
        ])
    }

    fn variable_bounds(&self) -> Array2<f64> {
        array![[-2.0, 2.0], [-1.0, 3.0]]
    }
}

fn rosenbrock_multistart() -> Result<MultistartResult<Rosenbrock>, MultistartError> {
    let solver = LocalSolver::new(
        LocalSolverType::LBFGS,
        LBFGSBuilder::default().max_iter(100).build(),
    );

    minimize(&Rosenbrock, &solver, 10, Some(&LatinHypercube::new(0)), None)
}

fn run_rosenbrock_multistart(c: &mut Criterion) {
    c.bench_function("rosenbrock_multistart", |b| b.iter(rosenbrock_multistart));
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20).measurement_time(std::time::Duration::from_secs(30));
    targets = run_rosenbrock_multistart
}
criterion_main!(benches);
