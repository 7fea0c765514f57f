use crate::config::SolverConfig;
use crate::error::Result;
use crate::matrix::dense::DenseMatrix;
use crate::matrix::element::Element;
use crate::system::system::System;
use itertools::iproduct;

/// Builds `n x n` systems for experiments.
pub trait Generator<T: Element> {
    fn generate(&self, n: usize) -> Result<System<T>>;
}

/// Entries come from index formulas: `matrix_formula(row, col)` and `rhs_formula(row)`.
pub struct FormulaGenerator<F, G> {
    matrix_formula: F,
    rhs_formula: G,
    config: SolverConfig,
}

impl<F, G> FormulaGenerator<F, G> {
    pub fn new(matrix_formula: F, rhs_formula: G) -> Self {
        FormulaGenerator {
            matrix_formula,
            rhs_formula,
            config: SolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }
}

impl<T, F, G> Generator<T> for FormulaGenerator<F, G>
where
    T: Element,
    F: Fn(usize, usize) -> T,
    G: Fn(usize) -> T,
{
    fn generate(&self, n: usize) -> Result<System<T>> {
        let cells = iproduct!(0..n, 0..n)
            .map(|(i, j)| (self.matrix_formula)(i, j))
            .collect();
        let rhs = (0..n).map(|i| (self.rhs_formula)(i)).collect();
        Ok(System::with_config(
            DenseMatrix::from_cells(n, n, cells)?,
            rhs,
            self.config,
        ))
    }
}

/// Uniform random systems over the configured range.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator {
    pub config: SolverConfig,
}

impl RandomGenerator {
    pub fn new(config: SolverConfig) -> Self {
        RandomGenerator { config }
    }
}

impl<T: Element> Generator<T> for RandomGenerator {
    fn generate(&self, n: usize) -> Result<System<T>> {
        System::random(n, self.config)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
