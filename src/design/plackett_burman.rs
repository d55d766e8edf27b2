//! Plackett-Burman screening designs.
//!
//! The run budget is rounded up to the next multiple of four and the sign
//! pattern comes from a [`HadamardTable`]. Factor `i` of `k` takes column
//! `n - k + i` of the table, so the all-`+` first column is never used.

use tracing::debug;

use super::{sign_matrix, Design, DesignMatrix};
use crate::error::{Error, Result};
use crate::factor::FactorSpec;
use crate::hadamard::{parse_sign_table, BuiltinHadamard, HadamardTable};

/// Plackett-Burman builder over a Hadamard table collaborator.
///
/// # Example
///
/// ```
/// use doe::design::{Design, PlackettBurman};
/// use doe::FactorSpec;
///
/// let spec = FactorSpec::new((0..7).map(|i| (format!("X{i}"), vec![0.0, 1.0]))).unwrap();
///
/// // 10 rounds up to 12
/// let design = PlackettBurman::new(10).build(&spec).unwrap();
/// assert_eq!(design.runs(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct PlackettBurman<T = BuiltinHadamard> {
    runs: usize,
    table: T,
}

impl PlackettBurman {
    /// Create a builder backed by the built-in Hadamard table.
    #[must_use]
    pub fn new(runs: usize) -> Self {
        Self::with_table(runs, BuiltinHadamard)
    }
}

impl<T: HadamardTable> PlackettBurman<T> {
    /// Create a builder that fetches sign tables from `table`.
    pub fn with_table(runs: usize, table: T) -> Self {
        Self { runs, table }
    }

    /// The run count after rounding up to a multiple of four.
    ///
    /// `None` if rounding overflows `usize`.
    #[must_use]
    pub fn rounded_runs(&self) -> Option<usize> {
        self.runs.div_ceil(4).checked_mul(4)
    }

    /// The Hadamard table in use.
    pub fn table(&self) -> &T {
        &self.table
    }
}

impl<T: HadamardTable> Design for PlackettBurman<T> {
    fn name(&self) -> &'static str {
        "Plackett-Burman"
    }

    fn run_count(&self, spec: &FactorSpec) -> Result<usize> {
        spec.require_factors(1, self.name())?;
        if self.runs == 0 {
            return Err(Error::invalid_params("Plackett-Burman run count must be positive"));
        }

        let runs = self.rounded_runs().ok_or_else(|| {
            Error::invalid_params(format!(
                "Plackett-Burman run count {} cannot be rounded up to a multiple of 4",
                self.runs
            ))
        })?;
        if spec.len() >= runs {
            return Err(Error::TooManyFactors {
                factors: spec.len(),
                max: runs - 1,
                design: self.name(),
            });
        }
        Ok(runs)
    }

    fn build(&self, spec: &FactorSpec) -> Result<DesignMatrix> {
        let runs = self.run_count(spec)?;
        spec.two_level_bounds()?;

        let rows = self.table.lookup(runs)?;
        let table = parse_sign_table(runs, &rows)?;

        let first = runs - spec.len();
        let signs = table.slice(ndarray::s![.., first..]).to_owned();

        debug!(design = self.name(), runs, factors = spec.len(), "built design");
        sign_matrix(spec.factors(), &signs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hadamard::LookupError;

    fn spec(k: usize) -> FactorSpec {
        FactorSpec::new((0..k).map(|i| (format!("X{i}"), vec![-(i as f64) - 1.0, i as f64 + 1.0])))
            .unwrap()
    }

    struct Broken;

    impl HadamardTable for Broken {
        fn lookup(&self, runs: usize) -> std::result::Result<Vec<String>, LookupError> {
            Ok(vec!["+".repeat(runs); runs - 1])
        }
    }

    #[test]
    fn test_rounding() {
        assert_eq!(PlackettBurman::new(9).rounded_runs(), Some(12));
        assert_eq!(PlackettBurman::new(12).rounded_runs(), Some(12));
        assert_eq!(PlackettBurman::new(13).rounded_runs(), Some(16));

        assert_eq!(PlackettBurman::new(usize::MAX).rounded_runs(), None);
        assert!(matches!(
            PlackettBurman::new(usize::MAX).run_count(&spec(3)),
            Err(Error::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_columns_balanced_and_orthogonal() {
        for runs in [8, 12, 16, 20, 24, 28, 32] {
            let k = runs - 1;
            let design = PlackettBurman::new(runs).build(&spec(k)).unwrap();
            assert_eq!(design.runs(), runs);

            let coded: Vec<Vec<f64>> = (0..k)
                .map(|c| design.column(c).iter().map(|v| v.signum()).collect())
                .collect();
            for a in 0..k {
                let sum: f64 = coded[a].iter().sum();
                assert_eq!(sum, 0.0, "{runs} runs, column {a} unbalanced");
                for b in (a + 1)..k {
                    let dot: f64 = coded[a].iter().zip(&coded[b]).map(|(x, y)| x * y).sum();
                    assert_eq!(dot, 0.0, "{runs} runs, columns {a} and {b}");
                }
            }
        }
    }

    #[test]
    fn test_uses_last_columns() {
        let rows = BuiltinHadamard.lookup(8).unwrap();
        let design = PlackettBurman::new(8).build(&spec(2)).unwrap();
        for (r, row) in rows.iter().enumerate() {
            let expected: Vec<f64> = row[6..]
                .chars()
                .zip([1.0, 2.0])
                .map(|(c, bound)| if c == '+' { bound } else { -bound })
                .collect();
            assert_eq!(design.data().row(r).to_vec(), expected, "run {r}");
        }
    }

    #[test]
    fn test_too_many_factors() {
        assert_eq!(
            PlackettBurman::new(8).build(&spec(8)),
            Err(Error::TooManyFactors {
                factors: 8,
                max: 7,
                design: "Plackett-Burman"
            })
        );
    }

    #[test]
    fn test_unsupported_run_count() {
        assert!(matches!(
            PlackettBurman::new(36).build(&spec(3)),
            Err(Error::UnsupportedRunCount { runs: 36, .. })
        ));
        assert!(matches!(
            PlackettBurman::new(0).build(&spec(3)),
            Err(Error::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_malformed_table() {
        assert!(matches!(
            PlackettBurman::with_table(8, Broken).build(&spec(3)),
            Err(Error::LookupFailed { runs: 8, .. })
        ));
    }
}
