//! Latin hypercube sampling.
//!
//! Each factor's unit interval is split into `n` equal strata and every
//! stratum receives exactly one of the `n` samples. The strata are paired
//! across factors by an independent random permutation per factor.

use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::factorial::names;
use super::{Design, DesignMatrix};
use crate::error::{Error, Result};
use crate::factor::FactorSpec;

/// Where a sample falls inside its stratum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LhsKind {
    /// Uniformly at random inside the stratum.
    #[default]
    Classic,
    /// At the stratum midpoint.
    Centered,
}

/// Seeded Latin hypercube sample rescaled to each factor's `[low, high]`.
///
/// The same samples, seed and kind always produce the same design.
///
/// # Example
///
/// ```
/// use doe::design::{Design, LatinHypercube};
/// use doe::FactorSpec;
///
/// let spec = FactorSpec::new([("A", vec![0.0, 1.0]), ("B", vec![100.0, 200.0])]).unwrap();
/// let lhs = LatinHypercube::new(10, 42);
///
/// let first = lhs.build(&spec).unwrap();
/// assert_eq!(first.runs(), 10);
/// assert_eq!(first, lhs.build(&spec).unwrap());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LatinHypercube {
    samples: usize,
    seed: u64,
    kind: LhsKind,
}

impl LatinHypercube {
    /// Create a classic Latin hypercube builder.
    #[must_use]
    pub fn new(samples: usize, seed: u64) -> Self {
        Self {
            samples,
            seed,
            kind: LhsKind::Classic,
        }
    }

    /// Set how samples are placed within their strata.
    #[must_use]
    pub fn kind(mut self, kind: LhsKind) -> Self {
        self.kind = kind;
        self
    }

    /// The configured seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Build the design drawing from the given random source.
    ///
    /// The configured seed is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] when `samples` is zero, or
    /// [`Error::DegenerateDesign`] when a factor's low and high coincide.
    pub fn build_with_rng<R: Rng + ?Sized>(
        &self,
        spec: &FactorSpec,
        rng: &mut R,
    ) -> Result<DesignMatrix> {
        let n = self.run_count(spec)?;
        let bounds = spec.two_level_bounds()?;

        let mut data = Array2::zeros((n, spec.len()));
        let mut strata: Vec<usize> = (0..n).collect();
        for (c, &(low, high)) in bounds.iter().enumerate() {
            strata.shuffle(rng);
            for (r, &stratum) in strata.iter().enumerate() {
                let offset = match self.kind {
                    LhsKind::Classic => rng.gen::<f64>(),
                    LhsKind::Centered => 0.5,
                };
                let unit = (stratum as f64 + offset) / n as f64;
                data[[r, c]] = low + unit * (high - low);
            }
        }

        debug!(design = self.name(), runs = n, factors = spec.len(), kind = ?self.kind, "built design");
        DesignMatrix::new(names(spec), data)
    }
}

impl Design for LatinHypercube {
    fn name(&self) -> &'static str {
        "LatinHypercube"
    }

    fn run_count(&self, spec: &FactorSpec) -> Result<usize> {
        spec.require_factors(1, self.name())?;
        if self.samples == 0 {
            return Err(Error::invalid_params(
                "Latin hypercube needs at least one sample",
            ));
        }
        Ok(self.samples)
    }

    fn build(&self, spec: &FactorSpec) -> Result<DesignMatrix> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.build_with_rng(spec, &mut rng)
    }
}
