//! Box-Behnken response-surface designs.

use ndarray::Array2;
use tracing::debug;

use super::factorial::names;
use super::{Design, DesignMatrix};
use crate::error::{Error, Result};
use crate::factor::FactorSpec;
use crate::utils::{binomial, combinations};

/// Box-Behnken design over each factor's low, mid and high level.
///
/// For every pair of factors (in combination order) the four corners
/// `(-,-), (-,+), (+,-), (+,+)` are run with all other factors at mid, then
/// `k` centre runs are appended. That gives `4·C(k,2) + k` runs.
///
/// # Example
///
/// ```
/// use doe::design::{BoxBehnken, Design};
/// use doe::FactorSpec;
///
/// let spec = FactorSpec::new([
///     ("A", vec![0.0, 10.0]),
///     ("B", vec![1.0, 3.0]),
///     ("C", vec![5.0, 6.0, 9.0]),
/// ])
/// .unwrap();
/// let design = BoxBehnken.build(&spec).unwrap();
///
/// assert_eq!(design.runs(), 15);
/// assert_eq!(design.run(0), vec![("A", 0.0), ("B", 1.0), ("C", 6.0)]);
/// assert_eq!(design.run(14), vec![("A", 5.0), ("B", 2.0), ("C", 6.0)]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxBehnken;

impl Design for BoxBehnken {
    fn name(&self) -> &'static str {
        "Box-Behnken"
    }

    fn run_count(&self, spec: &FactorSpec) -> Result<usize> {
        spec.require_factors(3, self.name())?;
        let k = spec.len();
        binomial(k as u64, 2)
            .and_then(|pairs| usize::try_from(pairs).ok())
            .and_then(|pairs| pairs.checked_mul(4))
            .and_then(|edges| edges.checked_add(k))
            .ok_or_else(|| Error::invalid_params("Box-Behnken run count overflows"))
    }

    fn build(&self, spec: &FactorSpec) -> Result<DesignMatrix> {
        let runs = self.run_count(spec)?;
        spec.two_level_bounds()?;

        let k = spec.len();
        let mut coded = Array2::<i8>::zeros((runs, k));
        let mut row = 0;
        for pair in combinations(k, 2) {
            for (a, b) in [(-1, -1), (-1, 1), (1, -1), (1, 1)] {
                coded[[row, pair[0]]] = a;
                coded[[row, pair[1]]] = b;
                row += 1;
            }
        }
        // Remaining `k` rows stay zero: the centre runs.

        let data = Array2::from_shape_fn((runs, k), |(r, c)| {
            let factor = &spec[c];
            match coded[[r, c]] {
                -1 => factor.low(),
                0 => factor.mid(),
                _ => factor.high(),
            }
        });

        debug!(design = self.name(), runs, factors = k, "built design");
        DesignMatrix::new(names(spec), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(k: usize) -> FactorSpec {
        FactorSpec::new((0..k).map(|i| (format!("F{i}"), vec![-1.0, 1.0]))).unwrap()
    }

    #[test]
    fn test_run_counts() {
        for (k, expected) in [(3, 15), (4, 28), (5, 45), (6, 66)] {
            assert_eq!(BoxBehnken.run_count(&spec(k)).unwrap(), expected, "k = {k}");
            assert_eq!(BoxBehnken.build(&spec(k)).unwrap().runs(), expected);
        }
    }

    #[test]
    fn test_edge_rows_have_two_nonzero() {
        let k = 4;
        let design = BoxBehnken.build(&spec(k)).unwrap();
        let edge_runs = design.runs() - k;

        for (r, row) in design.rows().enumerate() {
            let nonzero = row.iter().filter(|&&v| v != 0.0).count();
            if r < edge_runs {
                assert_eq!(nonzero, 2, "run {r}");
            } else {
                assert_eq!(nonzero, 0, "centre run {r}");
            }
        }
    }

    #[test]
    fn test_pair_block_order() {
        let design = BoxBehnken.build(&spec(3)).unwrap();
        // First block pairs F0 with F1
        let block: Vec<Vec<f64>> = (0..4).map(|r| design.data().row(r).to_vec()).collect();
        assert_eq!(
            block,
            vec![
                vec![-1.0, -1.0, 0.0],
                vec![-1.0, 1.0, 0.0],
                vec![1.0, -1.0, 0.0],
                vec![1.0, 1.0, 0.0],
            ]
        );
        // Third block pairs F1 with F2
        assert_eq!(design.data().row(8).to_vec(), vec![0.0, -1.0, -1.0]);
    }

    #[test]
    fn test_too_few_factors() {
        assert!(matches!(
            BoxBehnken.build(&spec(2)),
            Err(Error::InvalidFactorSpec { .. })
        ));
    }
}
