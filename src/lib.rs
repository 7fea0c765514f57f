//! Dense linear systems by Gaussian elimination with partial pivoting, plus the
//! determinant, inverse and condition number derived from the same elimination.

pub mod matrix {
    pub mod dense;
    pub mod element;
}
pub mod system {
    pub mod elimination;
    #[allow(clippy::module_inception)]
    pub mod system;
}

pub mod config;
pub mod error;
pub mod generate;
pub mod stability;
pub mod utils;

#[cfg(feature = "python")]
pub mod python;

pub use config::SolverConfig;
pub use error::{Error, Result};
pub use generate::{FormulaGenerator, Generator, RandomGenerator};
pub use matrix::dense::DenseMatrix;
pub use matrix::element::Element;
pub use system::elimination::{Elimination, Mode, Strategy};
pub use system::system::System;
