//! Sensitivity of the solver to a perturbed right-hand side.
//!
//! For a random system `M x = b`, solve again with `b` nudged by `delta` and
//! measure `|x - x*| / |x|`. Averaged over trials this gives the error curve
//! against system size, which tracks the condition number.

use crate::config::SolverConfig;
use crate::error::Result;
use crate::generate::{Generator, RandomGenerator};
use crate::matrix::dense::DenseMatrix;
use crate::matrix::element::{from_f64, Element};
use crate::system::system::System;
use crate::utils::{dist, norm};
use rayon::prelude::*;

/// Copy of `rhs` with `delta` added to the first entry.
pub fn perturb<T: Element>(rhs: &[T], delta: T) -> Vec<T> {
    let mut ret = rhs.to_vec();
    if let Some(first) = ret.first_mut() {
        *first = *first + delta;
    }
    ret
}

/// Relative distance between the solutions of `M x = b` and `M x* = perturb(b, delta)`.
pub fn relative_error<T: Element>(
    matrix: &DenseMatrix<T>,
    rhs: &[T],
    delta: T,
    config: SolverConfig,
) -> Result<T> {
    let x = System::with_config(matrix.copy(), rhs.to_vec(), config).solve()?;
    let x_star = System::with_config(matrix.copy(), perturb(rhs, delta), config).solve()?;
    Ok(dist(&x, &x_star) / norm(&x))
}

/// Average relative error per system size, over `trials` random systems each.
/// Sizes are processed concurrently, each with its own systems.
pub fn error_curve<T: Element>(
    sizes: &[usize],
    trials: usize,
    delta: T,
    config: SolverConfig,
) -> Result<Vec<(usize, T)>> {
    let generator = RandomGenerator::new(config);

    sizes
        .par_iter()
        .map(|&n| -> Result<(usize, T)> {
            let mut total = T::zero();
            for _ in 0..trials {
                let system: System<T> = generator.generate(n)?;
                total = total + relative_error(system.matrix(), system.rhs(), delta, config)?;
            }
            let trials = from_f64::<T>(trials.max(1) as f64);
            log::debug!("size {}: mean relative error {}", n, total / trials);
            Ok((n, total / trials))
        })
        .collect()
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_perturb() {
        let rhs = vec![1.0, 2.0, 3.0];
        assert_eq!(perturb(&rhs, 0.1), vec![1.1, 2.0, 3.0]);
        assert_eq!(rhs, vec![1.0, 2.0, 3.0]);
        assert!(perturb::<f64>(&[], 0.1).is_empty());
    }

    #[test]
    fn test_relative_error_identity() {
        let matrix = DenseMatrix::<f64>::identity(2);
        let err = relative_error(&matrix, &[3.0, 4.0], 0.5, SolverConfig::default()).unwrap();
        assert_abs_diff_eq!(err, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_relative_error_ill_conditioned() {
        let well = DenseMatrix::<f64>::identity(2);
        let ill = DenseMatrix::from_list(vec![vec![1.0, 1.0], vec![1.0, 1.0001]]).unwrap();
        let rhs = [2.0, 2.0001];
        let small = relative_error(&well, &rhs, 0.01, SolverConfig::default()).unwrap();
        let large = relative_error(&ill, &rhs, 0.01, SolverConfig::default()).unwrap();
        assert!(large > 100.0 * small);
    }

    #[test]
    fn test_error_curve() {
        let config = SolverConfig::default().with_random_range(-1.0, 1.0);
        let curve = error_curve::<f64>(&[3, 5, 8], 2, 0.1, config).unwrap();
        assert_eq!(curve.iter().map(|p| p.0).collect::<Vec<_>>(), vec![3, 5, 8]);
        assert!(curve.iter().all(|p| p.1.is_finite() && p.1 >= 0.0));
    }
}
