use crate::system::elimination::Strategy;

/// Tolerance used by `DenseMatrix::equal`.
pub const DEFAULT_TOLERANCE: f64 = 0.001;
pub const DEFAULT_RANDOM_MIN: f64 = -1000.0;
pub const DEFAULT_RANDOM_MAX: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub tolerance: f64,
    pub random_min: f64,
    pub random_max: f64,
    pub strategy: Strategy,
    /// Worker count for `Strategy::Parallel`; `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            tolerance: DEFAULT_TOLERANCE,
            random_min: DEFAULT_RANDOM_MIN,
            random_max: DEFAULT_RANDOM_MAX,
            strategy: Strategy::Sequential,
            threads: None,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_random_range(mut self, min: f64, max: f64) -> Self {
        self.random_min = min;
        self.random_max = max;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn parallel() -> Self {
        Self::default().with_strategy(Strategy::Parallel)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.tolerance, 0.001);
        assert_eq!((config.random_min, config.random_max), (-1000.0, 1000.0));
        assert_eq!(config.strategy, Strategy::Sequential);
        assert_eq!(config.threads, None);
    }

    #[test]
    fn test_builder() {
        let config = SolverConfig::parallel()
            .with_threads(4)
            .with_tolerance(1e-6)
            .with_random_range(-1.0, 1.0);
        assert_eq!(config.strategy, Strategy::Parallel);
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.tolerance, 1e-6);
        assert_eq!((config.random_min, config.random_max), (-1.0, 1.0));
    }
}
