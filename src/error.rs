//! Error types for gauss_elim

use thiserror::Error;

/// Result type alias using the crate's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or eliminating a system
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Operation needs a square coefficient matrix
    #[error("Matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// Operand dimensions do not line up
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// Literal data with rows of different lengths
    #[error("Row {row} has {got} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// No nonzero pivot left in this column
    #[error("Singular matrix: no pivot in column {pivot}")]
    Singular { pivot: usize },

    /// Singular system whose right-hand side cannot be met
    #[error("Inconsistent system: row {pivot} reduces to 0 = b")]
    Inconsistent { pivot: usize },

    /// Singular system with a free variable
    #[error("Infinite number of solutions: row {pivot} reduces to 0 = 0")]
    InfiniteSolutions { pivot: usize },

    #[error("Invalid random range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),
}
