//! Two-level fractional factorial designs.
//!
//! A run budget `R` fixes `p = ⌊log2 R⌋` base factors, whose 2^p full
//! factorial forms the design's base. Every remaining factor is aliased onto
//! a distinct interaction of base columns, taken in increasing size (all
//! pairs, then all triples, ...) in combination order.
//!
//! ## Example
//!
//! ```
//! use doe::design::{Design, FractionalFactorial};
//! use doe::FactorSpec;
//!
//! let spec = FactorSpec::new([
//!     ("A", vec![-1.0, 1.0]),
//!     ("B", vec![-1.0, 1.0]),
//!     ("C", vec![-1.0, 1.0]),
//!     ("D", vec![-1.0, 1.0]),
//! ])
//! .unwrap();
//!
//! let ff = FractionalFactorial::new(8);
//! let plan = ff.plan(&spec).unwrap();
//! assert_eq!(plan.generators()[0].to_string(), "D = A*B");
//! assert_eq!(plan.resolution(), Some(3));
//!
//! let design = ff.build(&spec).unwrap();
//! assert_eq!(design.runs(), 8);
//! ```

use std::fmt;

use ndarray::Array2;
use tracing::debug;

use super::{sign_matrix, standard_signs, Design, DesignMatrix};
use crate::error::{Error, Result};
use crate::factor::{FactorId, FactorSpec};
use crate::utils::combinations_by_size;

/// Largest number of generators for which the resolution is computed exactly.
const MAX_EXACT_GENERATORS: usize = 24;

/// Two-level fractional factorial builder.
#[derive(Debug, Clone, Copy)]
pub struct FractionalFactorial {
    runs: usize,
    min_resolution: Option<usize>,
}

impl FractionalFactorial {
    /// Create a builder with a run budget.
    ///
    /// Budgets that are not a power of two are rounded down.
    #[must_use]
    pub fn new(runs: usize) -> Self {
        Self {
            runs,
            min_resolution: None,
        }
    }

    /// Require at least this resolution; lower-resolution plans are an error.
    #[must_use]
    pub fn min_resolution(mut self, resolution: usize) -> Self {
        self.min_resolution = Some(resolution);
        self
    }

    /// The requested run budget.
    #[must_use]
    pub fn budget(&self) -> usize {
        self.runs
    }

    /// Number of base factors for `factors` factors: ⌊log2 R⌋, capped at `factors`.
    fn base_factors(&self, factors: usize) -> Result<usize> {
        if self.runs < 2 {
            return Err(Error::invalid_params(format!(
                "fractional factorial needs a run budget of at least 2, got {}",
                self.runs
            )));
        }
        let p = (usize::BITS - 1 - self.runs.leading_zeros()) as usize;
        Ok(p.min(factors))
    }

    /// Work out the aliasing scheme without building the design.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParams`] if the budget is below 2, more than 128
    ///   factors are given, or a minimum resolution is requested for a plan
    ///   whose resolution is not computed
    /// - [`Error::UnachievableResolution`] if the generated factors outnumber
    ///   the available base interactions
    /// - [`Error::ResolutionTooLow`] if a minimum resolution was requested
    ///   and the plan falls short
    pub fn plan(&self, spec: &FactorSpec) -> Result<FractionalPlan> {
        spec.require_factors(1, "FractionalFactorial")?;
        let k = spec.len();
        if k > 128 {
            return Err(Error::invalid_params(
                "fractional factorial supports at most 128 factors",
            ));
        }

        let p = self.base_factors(k)?;
        let generated = k - p;
        let available = (1usize << p) - p - 1;
        if generated > available {
            return Err(Error::UnachievableResolution {
                factors: k,
                base_factors: p,
                available,
            });
        }

        let generators: Vec<Generator> = combinations_by_size(p, 2)
            .zip(p..k)
            .map(|(base, factor)| Generator {
                factor: FactorId(factor),
                base: base.into_iter().map(FactorId).collect(),
            })
            .collect();

        let resolution = resolution(&generators);
        if let Some(required) = self.min_resolution {
            match resolution {
                Some(achieved) if achieved < required => {
                    return Err(Error::ResolutionTooLow { required, achieved });
                }
                None if !generators.is_empty() => {
                    return Err(Error::invalid_params(format!(
                        "resolution of a plan with {} generators is not computed; \
                         a minimum resolution cannot be checked above {MAX_EXACT_GENERATORS}",
                        generators.len()
                    )));
                }
                _ => {}
            }
        }

        let names = spec.names().iter().map(ToString::to_string).collect();
        Ok(FractionalPlan {
            runs: 1 << p,
            base_factors: p,
            generators,
            resolution,
            names,
        })
    }
}

impl Design for FractionalFactorial {
    fn name(&self) -> &'static str {
        "FractionalFactorial"
    }

    fn run_count(&self, spec: &FactorSpec) -> Result<usize> {
        spec.require_factors(1, self.name())?;
        Ok(1 << self.base_factors(spec.len())?)
    }

    fn build(&self, spec: &FactorSpec) -> Result<DesignMatrix> {
        spec.two_level_bounds()?;
        let plan = self.plan(spec)?;
        let signs = plan.signs();

        debug!(
            design = self.name(),
            runs = plan.runs,
            factors = spec.len(),
            resolution = ?plan.resolution,
            "built design"
        );
        sign_matrix(spec.factors(), &signs)
    }
}

/// A generated factor and the base columns it is aliased with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    /// The generated factor.
    pub factor: FactorId,
    /// The base factors whose product defines it.
    pub base: Vec<FactorId>,
}

impl Generator {
    /// Bitmask of the defining word `factor * base...`.
    fn word(&self) -> u128 {
        self.base
            .iter()
            .fold(1u128 << self.factor.0, |mask, b| mask | (1u128 << b.0))
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base: Vec<String> = self
            .base
            .iter()
            .map(|b| crate::utils::factor_letter(b.0))
            .collect();
        write!(
            f,
            "{} = {}",
            crate::utils::factor_letter(self.factor.0),
            base.join("*")
        )
    }
}

/// The aliasing scheme of a fractional factorial.
#[derive(Debug, Clone, PartialEq)]
pub struct FractionalPlan {
    runs: usize,
    base_factors: usize,
    generators: Vec<Generator>,
    resolution: Option<usize>,
    names: Vec<String>,
}

impl FractionalPlan {
    /// Number of runs, 2^p.
    #[must_use]
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Number of base factors p.
    #[must_use]
    pub fn base_factors(&self) -> usize {
        self.base_factors
    }

    /// The generators, in the order the generated factors appear.
    #[must_use]
    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    /// Generators written with factor names, e.g. `Enzyme = Temp*Concentration`.
    #[must_use]
    pub fn named_generators(&self) -> Vec<String> {
        self.generators
            .iter()
            .map(|g| {
                let base: Vec<&str> = g.base.iter().map(|b| self.names[b.0].as_str()).collect();
                format!("{} = {}", self.names[g.factor.0], base.join("*"))
            })
            .collect()
    }

    /// Length of the shortest word in the defining relation.
    ///
    /// `None` for an unfractionated design, which has no defining relation,
    /// and for plans with more than 24 generators, where it is not computed.
    #[must_use]
    pub fn resolution(&self) -> Option<usize> {
        self.resolution
    }

    /// Coded ±1 matrix: base full factorial plus one product column per generator.
    fn signs(&self) -> Array2<i8> {
        let p = self.base_factors;
        let k = p + self.generators.len();
        let base = standard_signs(p);

        let mut signs = Array2::zeros((self.runs, k));
        for r in 0..self.runs {
            for c in 0..p {
                signs[[r, c]] = base[[r, c]];
            }
            for g in &self.generators {
                signs[[r, g.factor.0]] = g.base.iter().map(|b| base[[r, b.0]]).product();
            }
        }
        signs
    }
}

/// Shortest word over all products of generator words.
fn resolution(generators: &[Generator]) -> Option<usize> {
    if generators.is_empty() || generators.len() > MAX_EXACT_GENERATORS {
        return None;
    }
    let words: Vec<u128> = generators.iter().map(Generator::word).collect();

    // Walk every non-empty subset in Gray-code order, one XOR per step.
    let mut mask = 0u128;
    let mut shortest = usize::MAX;
    for i in 1u64..(1u64 << words.len()) {
        mask ^= words[i.trailing_zeros() as usize];
        shortest = shortest.min(mask.count_ones() as usize);
    }
    Some(shortest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(k: usize) -> FactorSpec {
        FactorSpec::new((0..k).map(|i| (format!("F{i}"), vec![0.0, 1.0]))).unwrap()
    }

    #[test]
    fn test_run_count_rounds_down() {
        for (budget, expected) in [(8, 8), (9, 8), (15, 8), (16, 16), (31, 16)] {
            let design = FractionalFactorial::new(budget).build(&spec(6)).unwrap();
            assert_eq!(design.runs(), expected, "budget {budget}");
        }
    }

    #[test]
    fn test_half_fraction_pairs_first() {
        let plan = FractionalFactorial::new(8).plan(&spec(4)).unwrap();
        assert_eq!(plan.base_factors(), 3);
        assert_eq!(plan.generators().len(), 1);
        // Pairs come first: D = A*B
        assert_eq!(plan.generators()[0].factor, FactorId(3));
        assert_eq!(plan.generators()[0].base, vec![FactorId(0), FactorId(1)]);
        assert_eq!(plan.resolution(), Some(3));
        assert_eq!(plan.named_generators(), vec!["F3 = F0*F1"]);
    }

    #[test]
    fn test_generators_follow_combination_order() {
        let plan = FractionalFactorial::new(8).plan(&spec(7)).unwrap();
        let labels: Vec<String> = plan.generators().iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["D = A*B", "E = A*C", "F = B*C", "G = A*B*C"]);
    }

    #[test]
    fn test_generated_columns_are_products() {
        let spec = spec(5);
        let ff = FractionalFactorial::new(8);
        let plan = ff.plan(&spec).unwrap();
        let signs = plan.signs();

        for g in plan.generators() {
            for r in 0..signs.nrows() {
                let product: i8 = g.base.iter().map(|b| signs[[r, b.0]]).product();
                assert_eq!(signs[[r, g.factor.0]], product);
            }
        }

        let design = ff.build(&spec).unwrap();
        for col in 0..5 {
            let ones = design.column(col).iter().filter(|&&v| v == 1.0).count();
            assert_eq!(ones, 4, "column {col} should be balanced");
        }
    }

    #[test]
    fn test_unachievable_resolution() {
        // 8 runs: 3 base columns give 4 interactions, so at most 7 factors.
        assert!(FractionalFactorial::new(8).plan(&spec(7)).is_ok());
        assert_eq!(
            FractionalFactorial::new(8).plan(&spec(8)),
            Err(Error::UnachievableResolution {
                factors: 8,
                base_factors: 3,
                available: 4
            })
        );
        // 2 runs: a single base column has no interactions at all.
        assert!(matches!(
            FractionalFactorial::new(2).plan(&spec(2)),
            Err(Error::UnachievableResolution { .. })
        ));
    }

    #[test]
    fn test_min_resolution() {
        assert!(FractionalFactorial::new(16)
            .min_resolution(3)
            .plan(&spec(5))
            .is_ok());
        assert_eq!(
            FractionalFactorial::new(8).min_resolution(4).plan(&spec(5)),
            Err(Error::ResolutionTooLow {
                required: 4,
                achieved: 3
            })
        );
    }

    #[test]
    fn test_min_resolution_beyond_exact_limit() {
        // 32 runs: 5 base columns, 26 interactions available
        let at_limit = FractionalFactorial::new(32)
            .min_resolution(3)
            .plan(&spec(5 + MAX_EXACT_GENERATORS))
            .unwrap();
        assert_eq!(at_limit.resolution(), Some(3));

        let beyond = spec(6 + MAX_EXACT_GENERATORS);
        let plan = FractionalFactorial::new(32).plan(&beyond).unwrap();
        assert_eq!(plan.generators().len(), MAX_EXACT_GENERATORS + 1);
        assert_eq!(plan.resolution(), None);

        assert!(matches!(
            FractionalFactorial::new(32).min_resolution(3).plan(&beyond),
            Err(Error::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_budget_larger_than_full_factorial() {
        let plan = FractionalFactorial::new(64).plan(&spec(3)).unwrap();
        assert_eq!(plan.runs(), 8);
        assert!(plan.generators().is_empty());
        assert_eq!(plan.resolution(), None);
    }

    #[test]
    fn test_invalid_budget() {
        assert!(matches!(
            FractionalFactorial::new(1).build(&spec(2)),
            Err(Error::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_maps_to_supplied_levels() {
        let spec = FactorSpec::new([
            ("A", vec![10.0, 5.0]),
            ("B", vec![1.0, 2.0]),
            ("C", vec![0.1, 0.3]),
        ])
        .unwrap();
        let design = FractionalFactorial::new(4).build(&spec).unwrap();
        assert_eq!(design.runs(), 4);
        // A was given high-to-low, so its coded -1 is 10
        assert_eq!(design.column(0).to_vec(), vec![10.0, 10.0, 5.0, 5.0]);
        // C = A*B
        assert_eq!(design.column(2).to_vec(), vec![0.3, 0.1, 0.1, 0.3]);
    }
}
