use crate::config::SolverConfig;
use crate::error::Error;
use crate::matrix::dense::DenseMatrix;
use crate::system::elimination::Strategy;
use crate::system::system::System;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyType;

impl From<Error> for PyErr {
    fn from(error: Error) -> PyErr {
        PyValueError::new_err(error.to_string())
    }
}

// --------------------------------------------------
//                      PYTHON
// --------------------------------------------------

#[derive(Debug, Clone)]
#[pyclass(frozen, name = "Matrix")]
pub struct PyMatrix {
    inner: DenseMatrix<f64>,
}

#[pymethods]
impl PyMatrix {
    #[classmethod]
    pub fn from_list(_cls: &Bound<PyType>, lines: Vec<Vec<f64>>) -> PyResult<Self> {
        Ok(PyMatrix {
            inner: DenseMatrix::from_list(lines)?,
        })
    }

    #[classmethod]
    pub fn identity(_cls: &Bound<PyType>, n: usize) -> Self {
        PyMatrix {
            inner: DenseMatrix::identity(n),
        }
    }

    #[classmethod]
    pub fn random(
        _cls: &Bound<PyType>,
        min: f64,
        max: f64,
        rows: usize,
        cols: usize,
    ) -> PyResult<Self> {
        Ok(PyMatrix {
            inner: DenseMatrix::random(min, max, rows, cols)?,
        })
    }

    pub fn to_list(&self) -> Vec<Vec<f64>> {
        self.inner.to_list()
    }

    pub fn norm(&self) -> f64 {
        self.inner.norm()
    }

    pub fn __mul__(&self, rhs: &PyMatrix) -> PyResult<PyMatrix> {
        Ok(PyMatrix {
            inner: (&self.inner * &rhs.inner)?,
        })
    }

    pub fn __str__(&self) -> String {
        self.inner.to_string()
    }

    #[getter]
    pub fn rows(&self) -> usize {
        self.inner.rows()
    }

    #[getter]
    pub fn cols(&self) -> usize {
        self.inner.cols()
    }
}

/// Each call works on a fresh copy, so a Python `System` can be reused.
#[derive(Debug, Clone)]
#[pyclass(frozen, name = "System")]
pub struct PySystem {
    inner: System<f64>,
}

#[pymethods]
impl PySystem {
    #[new]
    #[pyo3(signature = (matrix, rhs, parallel = false))]
    fn new(matrix: &PyMatrix, rhs: Vec<f64>, parallel: bool) -> Self {
        let strategy = if parallel {
            Strategy::Parallel
        } else {
            Strategy::Sequential
        };
        PySystem {
            inner: System::with_config(
                matrix.inner.copy(),
                rhs,
                SolverConfig::default().with_strategy(strategy),
            ),
        }
    }

    pub fn solve(&self) -> PyResult<Vec<f64>> {
        Ok(self.inner.copy().solve()?)
    }

    pub fn determinant(&self) -> PyResult<f64> {
        Ok(self.inner.copy().determinant()?)
    }

    pub fn inverse(&self) -> PyResult<PyMatrix> {
        Ok(PyMatrix {
            inner: self.inner.inverse()?,
        })
    }

    pub fn condition_number(&self) -> PyResult<f64> {
        Ok(self.inner.condition_number()?)
    }
}

/// A Python module implemented in Rust.
#[pymodule]
fn gauss_elim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMatrix>()?;
    m.add_class::<PySystem>()?;
    Ok(())
}
