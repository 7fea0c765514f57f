use num_traits::{Float, NumCast};
use rand::distributions::uniform::SampleUniform;

pub trait Element:  // Avoid repeating all the traits
    Float
    + SampleUniform
    + Send
    + Sync
    + std::iter::Sum<Self>
    + std::fmt::Display
    + std::fmt::Debug
{
}

impl<T> Element for T where
    T: Float
        + SampleUniform
        + Send
        + Sync
        + std::iter::Sum<T>
        + std::fmt::Display
        + std::fmt::Debug
{
}

/// Converts the f64 literals used by configuration into the element type.
pub fn from_f64<T: Element>(value: f64) -> T {
    <T as NumCast>::from(value).unwrap_or_else(T::nan)
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f64() {
        assert_eq!(from_f64::<f64>(0.001), 0.001);
        assert_eq!(from_f64::<f32>(-1000.0), -1000.0f32);
    }
}
