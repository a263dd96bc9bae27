/// References:
///
/// Molga, M., & Smutnicki, C. Test functions for optimization needs (April 3, 2005), pp. 27-28. Retrieved January 2025, from https://robertmarks.org/Classes/ENGR5358/Papers/functions.pdf
use multistart::local_solver::builders::NelderMeadBuilder;
use multistart::local_solver::runner::LocalSolver;
use multistart::optimize::{minimize, MultistartError};
use multistart::problem::Problem;
use multistart::startpoint::Uniform;
use multistart::types::{EvaluationError, LocalSolverType};
use ndarray::{array, Array1, Array2};

#[derive(Debug, Clone)]
pub struct SixHumpCamel;

impl Problem for SixHumpCamel {
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

fn main() -> Result<(), MultistartError> {
    let problem = SixHumpCamel;
    let solver = LocalSolver::new(
        LocalSolverType::NelderMead,
        NelderMeadBuilder::default().max_iter(1000).build(),
    );

    let result = minimize(&problem, &solver, 10, Some(&Uniform::new(0)), None)?;

    match result.best() {
        Some(best) => {
            println!("Best solution found:");
            println!("Point: {}", best.x);
            println!("Objective: {}", best.fval);
        }
        None => println!("No start succeeded."),
    }

    Ok(())
}
