use crate::config::DEFAULT_TOLERANCE;
use crate::error::{Error, Result};
use crate::matrix::element::{from_f64, Element};
use rand::Rng;
use rayon::prelude::*;
use std::fmt;
use std::ops;

/// Row-major dense matrix. Every row has exactly `cols` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T> {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) cells: Vec<T>,
}

impl<T: Element> DenseMatrix<T> {
    pub fn from_list(lines: Vec<Vec<T>>) -> Result<Self> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.len()).unwrap_or(0);

        if let Some((row, line)) = lines.iter().enumerate().find(|(_, l)| l.len() != cols) {
            return Err(Error::RaggedRows {
                row,
                expected: cols,
                got: line.len(),
            });
        }

        Ok(DenseMatrix {
            rows,
            cols,
            cells: lines.into_iter().flatten().collect(),
        })
    }

    /// Row-major cells; `cells.len()` must equal `rows * cols`.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<T>) -> Result<Self> {
        if cells.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                expected: (rows, cols),
                got: (cells.len() / cols.max(1), cols),
            });
        }
        Ok(DenseMatrix { rows, cols, cells })
    }

    pub fn to_list(&self) -> Vec<Vec<T>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        DenseMatrix {
            rows,
            cols,
            cells: vec![T::zero(); rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        DenseMatrix {
            rows: n,
            cols: n,
            cells: (0..n)
                .flat_map(|i| (0..n).map(move |j| if i == j { T::one() } else { T::zero() }))
                .collect(),
        }
    }

    /// Uniform random entries drawn from `[min, max]` with the thread-local generator.
    pub fn random(min: T, max: T, rows: usize, cols: usize) -> Result<Self> {
        Self::random_with(&mut rand::thread_rng(), min, max, rows, cols)
    }

    pub fn random_with<R: Rng + ?Sized>(
        rng: &mut R,
        min: T,
        max: T,
        rows: usize,
        cols: usize,
    ) -> Result<Self> {
        crate::utils::check_range(min, max)?;

        Ok(DenseMatrix {
            rows,
            cols,
            cells: (0..rows * cols).map(|_| rng.gen_range(min..=max)).collect(),
        })
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    #[inline(always)]
    pub fn at(&self, row: usize, col: usize) -> T {
        self.cells[row * self.cols + col]
    }

    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.cells[row * self.cols + col] = value;
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.cells[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        &mut self.cells[i * self.cols..(i + 1) * self.cols]
    }

    /// Independent copy; the two matrices share no storage.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Frobenius norm.
    pub fn norm(&self) -> T {
        self.cells.iter().map(|&x| x * x).sum::<T>().sqrt()
    }

    /// Elementwise comparison with the default tolerance of 0.001.
    pub fn equal(&self, other: &DenseMatrix<T>) -> bool {
        self.equal_with_tolerance(other, from_f64(DEFAULT_TOLERANCE))
    }

    pub fn equal_with_tolerance(&self, other: &DenseMatrix<T>, tolerance: T) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .cells
                .iter()
                .zip(other.cells.iter())
                .all(|(&a, &b)| (a - b).abs() <= tolerance)
    }

    /// True when everything strictly below the main diagonal is exactly zero,
    /// which is what forward elimination leaves behind.
    pub fn is_upper_triangular(&self) -> bool {
        (1..self.rows).all(|i| (0..i.min(self.cols)).all(|j| self.at(i, j) == T::zero()))
    }

    /// True when everything strictly above the main diagonal is exactly zero.
    pub fn is_lower_triangular(&self) -> bool {
        (0..self.rows).all(|i| (i + 1..self.cols).all(|j| self.at(i, j) == T::zero()))
    }

    /// Appends the columns of `other` to the right of `self`, in place.
    pub fn extend(&mut self, other: &DenseMatrix<T>) -> Result<()> {
        if self.rows != other.rows {
            return Err(Error::ShapeMismatch {
                expected: (self.rows, other.cols),
                got: (other.rows, other.cols),
            });
        }

        let cols = self.cols + other.cols;
        let mut cells = Vec::with_capacity(self.rows * cols);
        for i in 0..self.rows {
            cells.extend_from_slice(self.row(i));
            cells.extend_from_slice(other.row(i));
        }

        self.cols = cols;
        self.cells = cells;
        Ok(())
    }

    /// Right half of an `n x 2n` matrix: the columns from `n` onward.
    pub fn submatrix(&self) -> Result<DenseMatrix<T>> {
        let n = self.rows;
        if self.cols != 2 * n {
            return Err(Error::ShapeMismatch {
                expected: (n, 2 * n),
                got: (self.rows, self.cols),
            });
        }

        Ok(DenseMatrix {
            rows: n,
            cols: n,
            cells: (0..n).flat_map(|i| self.row(i)[n..].to_vec()).collect(),
        })
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for k in 0..self.cols {
            self.cells.swap(a * self.cols + k, b * self.cols + k);
        }
    }

    pub fn transpose(&self) -> DenseMatrix<T> {
        DenseMatrix {
            rows: self.cols,
            cols: self.rows,
            cells: (0..self.cols)
                .flat_map(|c| (0..self.rows).map(move |r| self.at(r, c)))
                .collect(),
        }
    }

    pub fn mul_vec(&self, x: &[T]) -> Result<Vec<T>> {
        if x.len() != self.cols {
            return Err(Error::ShapeMismatch {
                expected: (self.cols, 1),
                got: (x.len(), 1),
            });
        }

        Ok((0..self.rows)
            .map(|i| self.row(i).iter().zip(x).map(|(&a, &b)| a * b).sum())
            .collect())
    }
}

impl<T: Element> ops::Mul<&DenseMatrix<T>> for &DenseMatrix<T> {
    type Output = Result<DenseMatrix<T>>;

    fn mul(self, rhs: &DenseMatrix<T>) -> Result<DenseMatrix<T>> {
        if self.cols != rhs.rows {
            return Err(Error::ShapeMismatch {
                expected: (self.cols, rhs.cols),
                got: (rhs.rows, rhs.cols),
            });
        }

        let mut result = DenseMatrix::zeros(self.rows, rhs.cols);
        if rhs.cols == 0 {
            return Ok(result);
        }

        let rot = rhs.transpose();

        result
            .cells
            .par_chunks_mut(rhs.cols)
            .enumerate()
            .for_each(|(r, row)| {
                let lhs = self.row(r);
                for (c, cell) in row.iter_mut().enumerate() {
                    *cell = lhs.iter().zip(rot.row(c)).map(|(&a, &b)| a * b).sum();
                }
            });

        Ok(result)
    }
}

impl<T: Element> fmt::Display for DenseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            let line = self.row(i).iter().map(|x| x.to_string()).collect::<Vec<_>>();
            writeln!(f, "[{}]", line.join(", "))?;
        }
        Ok(())
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
