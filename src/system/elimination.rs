use crate::error::{Error, Result};
use crate::matrix::dense::DenseMatrix;
use crate::matrix::element::Element;
use rayon::prelude::*;

/// How the rows below a pivot are updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    Sequential,
    /// One rayon task per row below the pivot, joined before the next pivot.
    Parallel,
}

/// What travels alongside the matrix during forward elimination.
pub enum Mode<'a, T> {
    /// Only the row swaps are counted, for the determinant sign.
    Determinant,
    /// The right-hand side is swapped and reduced with the matrix.
    Solve(&'a mut [T]),
    /// Row operations only; the right-hand side lives inside an augmented matrix.
    Augmented,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elimination {
    /// Upper triangular after `swaps` row exchanges.
    Reduced { swaps: usize },
    /// Column `pivot` has no nonzero candidate in rows `pivot..`.
    Singular { pivot: usize },
}

impl Elimination {
    pub fn is_reduced(&self) -> bool {
        matches!(self, Elimination::Reduced { .. })
    }

    /// `(-1)^swaps`, or zero for a singular matrix.
    pub fn sign<T: Element>(&self) -> T {
        match self {
            Elimination::Reduced { swaps } if swaps % 2 == 0 => T::one(),
            Elimination::Reduced { .. } => -T::one(),
            Elimination::Singular { .. } => T::zero(),
        }
    }
}

/// Runs `op` on a dedicated pool of `threads` workers, or on the global pool.
pub fn install<R, F>(threads: Option<usize>, op: F) -> Result<R>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    match threads {
        None => Ok(op()),
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| Error::ThreadPool(e.to_string()))?;
            Ok(pool.install(op))
        }
    }
}

/// Reduces the leading `rows x rows` block of `matrix` to upper triangular form
/// with partial pivoting. Columns past the block (augmented columns) follow the
/// same row operations.
pub fn forward_elimination<T: Element>(
    matrix: &mut DenseMatrix<T>,
    mut mode: Mode<'_, T>,
    strategy: Strategy,
) -> Result<Elimination> {
    let n = matrix.rows;
    if matrix.cols < n {
        return Err(Error::NotSquare {
            rows: n,
            cols: matrix.cols,
        });
    }
    if let Mode::Solve(rhs) = &mode {
        if rhs.len() != n {
            return Err(Error::ShapeMismatch {
                expected: (n, 1),
                got: (rhs.len(), 1),
            });
        }
    }

    log::debug!("forward elimination of {}x{} ({:?})", n, matrix.cols, strategy);

    let mut swaps = 0;
    for k in 0..n {
        let i_max = select_pivot(matrix, k);
        if matrix.at(i_max, k) == T::zero() {
            return Ok(Elimination::Singular { pivot: k });
        }

        if i_max != k {
            log::trace!("pivot {}: swapping rows {} and {}", k, k, i_max);
            matrix.swap_rows(k, i_max);
            match &mut mode {
                Mode::Solve(rhs) => rhs.swap(k, i_max),
                Mode::Determinant | Mode::Augmented => {}
            }
            swaps += 1;
        }

        let rhs = match &mut mode {
            Mode::Solve(rhs) => Some(&mut **rhs),
            Mode::Determinant | Mode::Augmented => None,
        };
        match strategy {
            Strategy::Sequential => eliminate_below(matrix, rhs, k),
            Strategy::Parallel => eliminate_below_parallel(matrix, rhs, k),
        }
    }

    Ok(Elimination::Reduced { swaps })
}

// Row with the largest magnitude in column `k`, first one wins on ties.
fn select_pivot<T: Element>(matrix: &DenseMatrix<T>, k: usize) -> usize {
    let mut i_max = k;
    let mut v_max = matrix.at(k, k).abs();
    for i in k + 1..matrix.rows {
        let v = matrix.at(i, k).abs();
        if v > v_max {
            v_max = v;
            i_max = i;
        }
    }
    i_max
}

#[inline(always)]
fn reduce_row<T: Element>(pivot: &[T], row: &mut [T], k: usize) -> T {
    let factor = row[k] / pivot[k];
    for j in k + 1..row.len() {
        row[j] = row[j] - pivot[j] * factor;
    }
    row[k] = T::zero();
    factor
}

fn eliminate_below<T: Element>(matrix: &mut DenseMatrix<T>, mut rhs: Option<&mut [T]>, k: usize) {
    let cols = matrix.cols;
    let (head, tail) = matrix.cells.split_at_mut((k + 1) * cols);
    let pivot = &head[k * cols..];

    for (offset, row) in tail.chunks_mut(cols).enumerate() {
        let factor = reduce_row(pivot, row, k);
        if let Some(rhs) = rhs.as_deref_mut() {
            let i = k + 1 + offset;
            rhs[i] = rhs[i] - rhs[k] * factor;
        }
    }
}

fn eliminate_below_parallel<T: Element>(
    matrix: &mut DenseMatrix<T>,
    rhs: Option<&mut [T]>,
    k: usize,
) {
    let cols = matrix.cols;
    let (head, tail) = matrix.cells.split_at_mut((k + 1) * cols);
    let pivot = &head[k * cols..];

    // for_each returns once every row is done: that is the barrier between pivots
    match rhs {
        Some(rhs) => {
            let (rhs_head, rhs_tail) = rhs.split_at_mut(k + 1);
            let b_k = rhs_head[k];
            tail.par_chunks_mut(cols)
                .zip(rhs_tail.par_iter_mut())
                .for_each(|(row, b)| {
                    let factor = reduce_row(pivot, row, k);
                    *b = *b - b_k * factor;
                });
        }
        None => tail.par_chunks_mut(cols).for_each(|row| {
            reduce_row(pivot, row, k);
        }),
    }
}

/// Solves an upper triangular system with a nonzero diagonal, last unknown first.
pub fn back_substitution<T: Element>(matrix: &DenseMatrix<T>, rhs: &[T]) -> Vec<T> {
    let n = matrix.rows;
    let mut x = vec![T::zero(); n];
    for i in (0..n).rev() {
        let row = matrix.row(i);
        let acc = rhs[i] - (i + 1..n).map(|j| row[j] * x[j]).sum::<T>();
        x[i] = acc / row[i];
    }
    x
}

/// Row Echelon Form -> Reduced Row Echelon Form, for a matrix that went through
/// a successful forward elimination: every pivot becomes 1 and the entries above
/// it become 0.
pub fn backward_reduction<T: Element>(matrix: &mut DenseMatrix<T>, strategy: Strategy) {
    let n = matrix.rows;
    let cols = matrix.cols;

    for k in (0..n).rev() {
        let row = matrix.row_mut(k);
        let pivot = row[k];
        for x in row[k + 1..].iter_mut() {
            *x = *x / pivot;
        }
        row[k] = T::one();

        let (head, tail) = matrix.cells.split_at_mut(k * cols);
        let pivot_row = &tail[..cols];
        let clear = |row: &mut [T]| {
            let factor = row[k];
            for j in k + 1..cols {
                row[j] = row[j] - pivot_row[j] * factor;
            }
            row[k] = T::zero();
        };
        match strategy {
            Strategy::Sequential => head.chunks_mut(cols).for_each(clear),
            Strategy::Parallel => head.par_chunks_mut(cols).for_each(clear),
        }
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> DenseMatrix<f64> {
        DenseMatrix::from_list(vec![
            vec![3.0, 2.0, -4.0],
            vec![2.0, 3.0, 3.0],
            vec![5.0, -3.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_forward_elimination() {
        for strategy in [Strategy::Sequential, Strategy::Parallel] {
            let mut m = sample();
            let mut b = vec![3.0, 15.0, 14.0];
            let result = forward_elimination(&mut m, Mode::Solve(&mut b[..]), strategy).unwrap();
            assert!(result.is_reduced());
            assert!(m.is_upper_triangular());
            // largest magnitude in column 0 is the 5 on the last row
            assert_eq!(m.row(0), &[5.0, -3.0, 1.0]);
            assert_eq!(b[0], 14.0);
        }
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in [1, 2, 5, 17, 40] {
            let m = DenseMatrix::<f64>::random_with(&mut rng, -10.0, 10.0, n, n).unwrap();
            let b = crate::utils::rand_floats_with(&mut rng, -10.0, 10.0, n).unwrap();

            let (mut m_seq, mut b_seq) = (m.copy(), b.clone());
            let (mut m_par, mut b_par) = (m.copy(), b.clone());
            let seq = forward_elimination(&mut m_seq, Mode::Solve(&mut b_seq[..]), Strategy::Sequential)
                .unwrap();
            let par = forward_elimination(&mut m_par, Mode::Solve(&mut b_par[..]), Strategy::Parallel)
                .unwrap();

            assert_eq!(seq, par);
            assert!(m_seq.is_upper_triangular());
            assert!(m_par.is_upper_triangular());
            assert!(m_seq.equal(&m_par));
            for (x, y) in b_seq.iter().zip(&b_par) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn test_singular_signal() {
        for strategy in [Strategy::Sequential, Strategy::Parallel] {
            let mut m = DenseMatrix::from_list(vec![
                vec![1.0, 2.0, 3.0],
                vec![2.0, 4.0, 6.0],
                vec![1.0, 0.0, 1.0],
            ])
            .unwrap();
            let result = forward_elimination(&mut m, Mode::Determinant, strategy).unwrap();
            assert_eq!(result, Elimination::Singular { pivot: 2 });
            assert_eq!(result.sign::<f64>(), 0.0);
        }

        let mut zero = DenseMatrix::<f64>::zeros(2, 2);
        assert_eq!(
            forward_elimination(&mut zero, Mode::Determinant, Strategy::Sequential).unwrap(),
            Elimination::Singular { pivot: 0 }
        );
    }

    #[test]
    fn test_pivot_ties_keep_first_row() {
        let mut m = DenseMatrix::from_list(vec![
            vec![1.0, 1.0],
            vec![-4.0, 1.0],
            vec![4.0, 2.0],
        ])
        .unwrap();
        assert_eq!(select_pivot(&m, 0), 1);
        m.set(1, 0, 3.0);
        assert_eq!(select_pivot(&m, 0), 2);
    }

    #[test]
    fn test_determinant_mode_counts_swaps() {
        let mut m = DenseMatrix::from_list(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let result = forward_elimination(&mut m, Mode::Determinant, Strategy::Sequential).unwrap();
        assert_eq!(result, Elimination::Reduced { swaps: 1 });
        assert_eq!(result.sign::<f64>(), -1.0);
    }

    #[test]
    fn test_shape_checks() {
        let mut wide = DenseMatrix::<f64>::zeros(3, 2);
        assert_eq!(
            forward_elimination(&mut wide, Mode::Determinant, Strategy::Sequential),
            Err(Error::NotSquare { rows: 3, cols: 2 })
        );

        let mut m = sample();
        let mut b = vec![1.0, 2.0];
        assert!(forward_elimination(&mut m, Mode::Solve(&mut b[..]), Strategy::Sequential).is_err());
    }

    #[test]
    fn test_back_substitution() {
        let m = DenseMatrix::from_list(vec![
            vec![2.0, 1.0, -1.0],
            vec![0.0, 1.0, 2.0],
            vec![0.0, 0.0, 4.0],
        ])
        .unwrap();
        let x = back_substitution(&m, &[3.0, 5.0, 8.0]);
        assert_eq!(x, vec![2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_backward_reduction() {
        for strategy in [Strategy::Sequential, Strategy::Parallel] {
            let mut m = sample();
            m.extend(&DenseMatrix::identity(3)).unwrap();
            forward_elimination(&mut m, Mode::Augmented, strategy).unwrap();
            backward_reduction(&mut m, strategy);

            for i in 0..3 {
                for j in 0..3 {
                    let want = if i == j { 1.0 } else { 0.0 };
                    assert_abs_diff_eq!(m.at(i, j), want, epsilon = 1e-12);
                }
            }
            let product = (&m.submatrix().unwrap() * &sample()).unwrap();
            assert!(product.equal_with_tolerance(&DenseMatrix::identity(3), 1e-9));
        }
    }

    #[test]
    fn test_install_with_threads() {
        let value = install(Some(2), || rayon::current_num_threads()).unwrap();
        assert_eq!(value, 2);
        assert!(install(None, || 1).is_ok());
    }
}
