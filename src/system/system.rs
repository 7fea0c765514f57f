use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::matrix::dense::DenseMatrix;
use crate::matrix::element::{from_f64, Element};
use crate::system::elimination::{
    back_substitution, backward_reduction, forward_elimination, install, Elimination, Mode,
};

/// A coefficient matrix paired with its right-hand side.
///
/// Every algorithm works in place on the owned matrix and vector, so callers
/// that need the original afterwards take a `copy()` first.
#[derive(Debug, Clone, PartialEq)]
pub struct System<T> {
    matrix: DenseMatrix<T>,
    rhs: Vec<T>,
    config: SolverConfig,
}

impl<T: Element> System<T> {
    pub fn new(matrix: DenseMatrix<T>, rhs: Vec<T>) -> Self {
        Self::with_config(matrix, rhs, SolverConfig::default())
    }

    pub fn with_config(matrix: DenseMatrix<T>, rhs: Vec<T>, config: SolverConfig) -> Self {
        System {
            matrix,
            rhs,
            config,
        }
    }

    /// Random square system with entries from the configured range.
    pub fn random(n: usize, config: SolverConfig) -> Result<Self> {
        let (min, max) = (from_f64(config.random_min), from_f64(config.random_max));
        Ok(Self::with_config(
            DenseMatrix::random(min, max, n, n)?,
            crate::utils::rand_floats(min, max, n)?,
            config,
        ))
    }

    pub fn matrix(&self) -> &DenseMatrix<T> {
        &self.matrix
    }

    pub fn rhs(&self) -> &[T] {
        &self.rhs
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn into_parts(self) -> (DenseMatrix<T>, Vec<T>) {
        (self.matrix, self.rhs)
    }

    /// Deep copy of both the matrix and the right-hand side.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    fn check_square(&self) -> Result<()> {
        if !self.matrix.is_square() {
            return Err(Error::NotSquare {
                rows: self.matrix.rows(),
                cols: self.matrix.cols(),
            });
        }
        Ok(())
    }

    /// Shared forward elimination primitive, run with the configured strategy.
    pub fn forward_elimination(&mut self, mode: Mode<'_, T>) -> Result<Elimination> {
        let (strategy, threads) = (self.config.strategy, self.config.threads);
        let matrix = &mut self.matrix;
        install(threads, move || forward_elimination(matrix, mode, strategy))?
    }

    /// Gaussian elimination with partial pivoting followed by back substitution.
    ///
    /// A singular system is classified from the reduced right-hand side at the
    /// failing pivot alone: nonzero is `Inconsistent`, zero is `InfiniteSolutions`.
    /// This is a heuristic, rows below the pivot are not inspected.
    pub fn solve(&mut self) -> Result<Vec<T>> {
        self.check_square()?;
        let (strategy, threads) = (self.config.strategy, self.config.threads);
        let (matrix, rhs) = (&mut self.matrix, &mut self.rhs);

        let result = install(threads, || {
            forward_elimination(&mut *matrix, Mode::Solve(&mut rhs[..]), strategy)
        })??;

        match result {
            Elimination::Reduced { .. } => Ok(back_substitution(matrix, rhs)),
            Elimination::Singular { pivot } if rhs[pivot] != T::zero() => {
                log::warn!("singular matrix, row {} is inconsistent", pivot);
                Err(Error::Inconsistent { pivot })
            }
            Elimination::Singular { pivot } => {
                log::warn!("singular matrix, row {} leaves a free variable", pivot);
                Err(Error::InfiniteSolutions { pivot })
            }
        }
    }

    /// Product of the reduced diagonal times the sign of the row permutation.
    /// A singular matrix has determinant zero.
    pub fn determinant(&mut self) -> Result<T> {
        self.check_square()?;
        let result = self.forward_elimination(Mode::Determinant)?;

        if let Elimination::Singular { pivot } = result {
            log::debug!("singular matrix at pivot {}, determinant is 0", pivot);
            return Ok(T::zero());
        }

        let n = self.matrix.rows();
        let diagonal = (0..n).fold(T::one(), |acc, i| acc * self.matrix.at(i, i));
        Ok(diagonal * result.sign())
    }

    /// Gauss-Jordan inversion of `[M | I]`. The augmented matrix is a local
    /// copy, so `self` keeps its shape and contents on success and on error.
    pub fn inverse(&self) -> Result<DenseMatrix<T>> {
        self.check_square()?;
        let n = self.matrix.rows();
        let mut augmented = self.matrix.copy();
        augmented.extend(&DenseMatrix::identity(n))?;

        let (strategy, threads) = (self.config.strategy, self.config.threads);
        let matrix = &mut augmented;
        let result = install(threads, || -> Result<Elimination> {
            let result = forward_elimination(&mut *matrix, Mode::Augmented, strategy)?;
            if result.is_reduced() {
                backward_reduction(&mut *matrix, strategy);
            }
            Ok(result)
        })??;

        match result {
            Elimination::Reduced { .. } => augmented.submatrix(),
            Elimination::Singular { pivot } => {
                log::warn!("singular matrix at pivot {}, no inverse", pivot);
                Err(Error::Singular { pivot })
            }
        }
    }

    /// `norm(M) * norm(M^-1)`; `self` is untouched since inversion works on a copy.
    /// A singular matrix has an infinite condition number.
    pub fn condition_number(&self) -> Result<T> {
        let inverse = match self.inverse() {
            Ok(inverse) => inverse,
            Err(Error::Singular { .. }) => return Ok(T::infinity()),
            Err(error) => return Err(error),
        };
        Ok(self.matrix.norm() * inverse.norm())
    }

    /// Checks `M x = b` elementwise within the configured tolerance.
    /// Only meaningful before the system has been eliminated.
    pub fn is_solution(&self, x: &[T]) -> Result<bool> {
        let tolerance = from_f64::<T>(self.config.tolerance);
        let product = self.matrix.mul_vec(x)?;
        if product.len() != self.rhs.len() {
            return Err(Error::ShapeMismatch {
                expected: (self.rhs.len(), 1),
                got: (product.len(), 1),
            });
        }
        Ok(product
            .iter()
            .zip(&self.rhs)
            .all(|(&a, &b)| (a - b).abs() <= tolerance))
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
