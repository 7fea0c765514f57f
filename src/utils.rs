use crate::error::{Error, Result};
use crate::matrix::element::Element;
use num_traits::ToPrimitive;
use rand::Rng;
use std::iter::zip;

pub fn check_range<T: Element>(min: T, max: T) -> Result<()> {
    // also rejects NaN bounds and ranges too wide to sample
    if min <= max && (max - min).is_finite() {
        return Ok(());
    }
    Err(Error::InvalidRange {
        min: min.to_f64().unwrap_or(f64::NAN),
        max: max.to_f64().unwrap_or(f64::NAN),
    })
}

/// `n` uniform random values drawn from `[min, max]`.
pub fn rand_floats<T: Element>(min: T, max: T, n: usize) -> Result<Vec<T>> {
    rand_floats_with(&mut rand::thread_rng(), min, max, n)
}

pub fn rand_floats_with<T: Element, R: Rng + ?Sized>(
    rng: &mut R,
    min: T,
    max: T,
    n: usize,
) -> Result<Vec<T>> {
    check_range(min, max)?;
    Ok((0..n).map(|_| rng.gen_range(min..=max)).collect())
}

/// Euclidean norm of a vector.
pub fn norm<T: Element>(x: &[T]) -> T {
    x.iter().map(|&v| v * v).sum::<T>().sqrt()
}

/// Euclidean distance between two vectors of the same length.
pub fn dist<T: Element>(x: &[T], y: &[T]) -> T {
    assert_eq!(x.len(), y.len());
    zip(x, y).map(|(&a, &b)| (a - b) * (a - b)).sum::<T>().sqrt()
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
