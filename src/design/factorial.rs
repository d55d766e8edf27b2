//! Full factorial designs.
//!
//! Runs are generated in standard order: lexicographic over factors in
//! column order with the last factor varying fastest.

use ndarray::Array2;
use tracing::debug;

use super::{Design, DesignMatrix};
use crate::error::{Error, Result};
use crate::factor::{Factor, FactorSpec};

/// General full factorial over every supplied level of every factor.
///
/// Produces ∏ |levels_i| runs. Levels are used in the order they were
/// supplied, so a factor given as `[3, 1, 2]` cycles through 3, 1, 2.
///
/// # Example
///
/// ```
/// use doe::design::{Design, FullFactorial};
/// use doe::FactorSpec;
///
/// let spec = FactorSpec::new([("A", vec![1.0, 2.0, 3.0]), ("B", vec![0.0, 5.0])]).unwrap();
/// let design = FullFactorial.build(&spec).unwrap();
///
/// assert_eq!(design.runs(), 6);
/// assert_eq!(design.run(1), vec![("A", 1.0), ("B", 5.0)]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FullFactorial;

impl Design for FullFactorial {
    fn name(&self) -> &'static str {
        "FullFactorial"
    }

    fn run_count(&self, spec: &FactorSpec) -> Result<usize> {
        spec.require_factors(1, self.name())?;
        Self::runs_for(spec)
    }

    fn build(&self, spec: &FactorSpec) -> Result<DesignMatrix> {
        let sizes: Vec<usize> = spec.iter().map(|f| f.levels().len()).collect();
        let runs = self.run_count(spec)?;

        let mut data = Array2::zeros((runs, spec.len()));
        let mut counters = vec![0usize; spec.len()];
        for run in 0..runs {
            for (col, factor) in spec.iter().enumerate() {
                data[[run, col]] = factor.levels()[counters[col]];
            }
            // Odometer step, last factor fastest
            for col in (0..counters.len()).rev() {
                counters[col] += 1;
                if counters[col] < sizes[col] {
                    break;
                }
                counters[col] = 0;
            }
        }

        debug!(design = self.name(), runs, factors = spec.len(), "built design");
        DesignMatrix::new(names(spec), data)
    }
}

impl FullFactorial {
    /// Number of runs for a concrete specification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if the product overflows `usize`.
    pub fn runs_for(spec: &FactorSpec) -> Result<usize> {
        spec.iter().try_fold(1usize, |acc, f| {
            acc.checked_mul(f.levels().len())
                .ok_or_else(|| Error::invalid_params("full factorial run count overflows"))
        })
    }
}

/// Two-level full factorial over each factor's two levels.
///
/// Produces 2^k runs; every combination of the two levels appears exactly
/// once. A factor given exactly two levels keeps their supplied order, so on
/// such a spec the result equals [`FullFactorial`]. Factors with more levels
/// use their low and high.
///
/// # Example
///
/// ```
/// use doe::design::{Design, TwoLevelFullFactorial};
/// use doe::FactorSpec;
///
/// let spec = FactorSpec::new([("A", vec![0.0, 1.0]), ("B", vec![10.0, 20.0])]).unwrap();
/// let design = TwoLevelFullFactorial.build(&spec).unwrap();
///
/// assert_eq!(design.runs(), 4);
/// assert_eq!(design.run(2), vec![("A", 1.0), ("B", 10.0)]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoLevelFullFactorial;

impl Design for TwoLevelFullFactorial {
    fn name(&self) -> &'static str {
        "TwoLevelFullFactorial"
    }

    fn run_count(&self, spec: &FactorSpec) -> Result<usize> {
        spec.require_factors(1, self.name())?;
        let factors = spec.len();
        u32::try_from(factors)
            .ok()
            .and_then(|k| 1usize.checked_shl(k))
            .filter(|&n| n != 0)
            .ok_or_else(|| Error::invalid_params(format!("2^{factors} runs overflows")))
    }

    fn build(&self, spec: &FactorSpec) -> Result<DesignMatrix> {
        self.run_count(spec)?;
        spec.two_level_bounds()?;

        let signs = standard_signs(spec.len());
        debug!(design = self.name(), runs = signs.nrows(), factors = spec.len(), "built design");
        sign_matrix(spec.factors(), &signs)
    }
}

/// Coded ±1 two-level full factorial in standard order.
///
/// Row `r`, column `j` is +1 when bit `k - 1 - j` of `r` is set, so the
/// first column varies slowest.
pub(crate) fn standard_signs(k: usize) -> Array2<i8> {
    let runs = 1usize << k;
    Array2::from_shape_fn((runs, k), |(r, j)| {
        if (r >> (k - 1 - j)) & 1 == 1 {
            1
        } else {
            -1
        }
    })
}

/// Decode a coded ±1 matrix onto each factor's [`coded_levels`](Factor::coded_levels).
pub(crate) fn sign_matrix(factors: &[Factor], signs: &Array2<i8>) -> Result<DesignMatrix> {
    let coded: Vec<(f64, f64)> = factors.iter().map(Factor::coded_levels).collect();
    let data = Array2::from_shape_fn(signs.dim(), |(r, c)| {
        let (minus, plus) = coded[c];
        if signs[[r, c]] < 0 {
            minus
        } else {
            plus
        }
    });
    DesignMatrix::new(factors.iter().map(|f| f.name().to_string()).collect(), data)
}

pub(super) fn names(spec: &FactorSpec) -> Vec<String> {
    spec.iter().map(|f| f.name().to_string()).collect()
}
