/// References:
///
/// Molga, M., & Smutnicki, C. Test functions for optimization needs (April 3, 2005), p. 5. Retrieved January 2025, from https://robertmarks.org/Classes/ENGR5358/Papers/functions.pdf
use multistart::local_solver::builders::LBFGSBuilder;
use multistart::local_solver::runner::LocalSolver;
use multistart::observers::Observer;
use multistart::optimize::{Multistart, MultistartError};
use multistart::problem::Problem;
use multistart::startpoint::LatinHypercube;
use multistart::types::{EvaluationError, LocalSolverType};
use ndarray::{array, Array1, Array2};

#[derive(Debug, Clone)]
pub struct Rosenbrock;

impl Problem for Rosenbrock {
    fn objective(&self, x: &Array1<f64>) -> Result<f64, EvaluationError> {
        Ok((1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2))
    }

    // Calculated analytically, reference didn't provide gradient
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

fn main() -> Result<(), MultistartError> {
    let problem = Rosenbrock;
    let solver = LocalSolver::new(
        LocalSolverType::LBFGS,
        LBFGSBuilder::default().max_iter(200).build(),
    );

    let mut driver = Multistart::new(&problem, &solver)
        .add_observer(Observer::new().with_timing().verbose());

    let result = driver.run(20, Some(&LatinHypercube::new(42)), None)?;

    println!("{}", result.optimize_result);

    if let Some(observer) = driver.observer() {
        println!(
            "attempted {} starts, {} failed, {} objective evaluations",
            observer.n_attempted(),
            observer.n_failed(),
            observer.function_evaluations()
        );
        if let Some(time) = observer.total_time() {
            println!("total time: {:.3}s", time);
        }
    }

    Ok(())
}
