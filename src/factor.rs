//! Factors and the ordered factor specification every design is built from.
//!
//! A [`FactorSpec`] is constructed once from the caller's `(name, levels)`
//! pairs and fixes the column order of every design derived from it.
//!
//! ```
//! use doe::FactorSpec;
//!
//! let spec = FactorSpec::new([
//!     ("Temp", vec![50.0, 25.0]),
//!     ("Concentration", vec![0.4, 0.6]),
//! ])
//! .unwrap();
//!
//! assert_eq!(spec.names(), vec!["Temp", "Concentration"]);
//! assert_eq!(spec[0].low(), 25.0);
//! assert_eq!(spec[0].high(), 50.0);
//! ```

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Position of a factor in its [`FactorSpec`], and so of its design column.
///
/// Generators of fractional designs and screening effect terms both refer to
/// factors through this index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactorId(pub usize);

impl fmt::Display for FactorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single experimental factor: a name and its numeric levels.
///
/// Levels keep the caller's order. Two-level designs consume only
/// [`coded_levels`](Factor::coded_levels); three-level designs use
/// [`low`](Factor::low), [`mid`](Factor::mid) and [`high`](Factor::high);
/// the general full factorial uses every level.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Factor {
    name: String,
    levels: Vec<f64>,
}

impl Factor {
    /// Create a factor, validating its name and levels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFactorSpec`] if the name is empty, fewer than
    /// two levels are given, or any level is not a finite number.
    pub fn new(name: impl Into<String>, levels: impl Into<Vec<f64>>) -> Result<Self> {
        let name = name.into();
        let levels = levels.into();

        if name.trim().is_empty() {
            return Err(Error::invalid_factor(name, "factor name must not be empty"));
        }
        if levels.len() < 2 {
            return Err(Error::invalid_factor(
                name,
                format!("at least 2 levels are required, got {}", levels.len()),
            ));
        }
        if let Some(bad) = levels.iter().find(|v| !v.is_finite()) {
            return Err(Error::invalid_factor(
                name,
                format!("level {bad} is not a finite number"),
            ));
        }

        Ok(Self { name, levels })
    }

    /// The factor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The levels in the order they were supplied.
    #[must_use]
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// The smallest level.
    #[must_use]
    pub fn low(&self) -> f64 {
        self.levels.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// The largest level.
    #[must_use]
    pub fn high(&self) -> f64 {
        self.levels.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// The centre level used by three-level designs.
    ///
    /// When exactly three distinct levels are supplied the middle one is
    /// used; otherwise the arithmetic mean of `low` and `high`.
    #[must_use]
    pub fn mid(&self) -> f64 {
        let distinct = self.distinct_levels();
        if distinct.len() == 3 {
            distinct[1]
        } else {
            (self.low() + self.high()) / 2.0
        }
    }

    /// The distinct levels in ascending order.
    #[must_use]
    pub fn distinct_levels(&self) -> Vec<f64> {
        let mut sorted = self.levels.clone();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup();
        sorted
    }

    /// The `(low, high)` pair for two-level designs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateDesign`] if low and high coincide.
    pub fn two_level_bounds(&self) -> Result<(f64, f64)> {
        let (low, high) = (self.low(), self.high());
        if low == high {
            return Err(Error::DegenerateDesign {
                factor: self.name.clone(),
                value: low,
            });
        }
        Ok((low, high))
    }

    /// The levels coded -1 and +1 stand for in two-level designs.
    ///
    /// A factor with exactly two distinct levels keeps the supplied order:
    /// the first level is coded -1, the other +1. With three or more
    /// distinct levels the pair is `(low, high)`.
    ///
    /// ```
    /// use doe::Factor;
    ///
    /// assert_eq!(Factor::new("Temp", [50.0, 25.0]).unwrap().coded_levels(), (50.0, 25.0));
    /// assert_eq!(Factor::new("Temp", [50.0, 25.0, 40.0]).unwrap().coded_levels(), (25.0, 50.0));
    /// ```
    #[must_use]
    pub fn coded_levels(&self) -> (f64, f64) {
        let distinct = self.distinct_levels();
        match (self.levels.first(), distinct.as_slice()) {
            (Some(&first), &[a, b]) => (first, if first == a { b } else { a }),
            _ => (self.low(), self.high()),
        }
    }
}

/// An ordered list of uniquely named factors.
///
/// Column order of every design equals the order factors were supplied in.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactorSpec {
    factors: Vec<Factor>,
}

impl FactorSpec {
    /// Build a specification from `(name, levels)` pairs, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFactorSpec`] if any factor is invalid or a
    /// name appears twice.
    pub fn new<I, N, L>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, L)>,
        N: Into<String>,
        L: Into<Vec<f64>>,
    {
        let mut spec = Self::default();
        for (name, levels) in entries {
            spec.push(Factor::new(name, levels)?)?;
        }
        Ok(spec)
    }

    /// Build a specification from already validated factors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFactorSpec`] on duplicate names.
    pub fn from_factors(factors: Vec<Factor>) -> Result<Self> {
        let mut spec = Self::default();
        for factor in factors {
            spec.push(factor)?;
        }
        Ok(spec)
    }

    /// Append a factor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFactorSpec`] if the name is already taken.
    pub fn push(&mut self, factor: Factor) -> Result<()> {
        if self.position(factor.name()).is_some() {
            return Err(Error::invalid_factor(
                factor.name(),
                "duplicate factor name",
            ));
        }
        self.factors.push(factor);
        Ok(())
    }

    /// Number of factors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Whether the specification has no factors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Iterate over the factors in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Factor> {
        self.factors.iter()
    }

    /// The factors as a slice.
    #[must_use]
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Factor names in column order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factors.iter().map(Factor::name).collect()
    }

    /// Position of the named factor.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.factors.iter().position(|f| f.name() == name)
    }

    /// Look up a factor by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Factor> {
        self.factors.iter().find(|f| f.name() == name)
    }

    /// Fail unless at least `min` factors are present.
    pub(crate) fn require_factors(&self, min: usize, design: &str) -> Result<()> {
        if self.len() < min {
            return Err(Error::invalid_factor(
                "",
                format!(
                    "{design} design needs at least {min} factor(s), got {}",
                    self.len()
                ),
            ));
        }
        Ok(())
    }

    /// `(low, high)` bounds of every factor, failing on degenerate ones.
    pub(crate) fn two_level_bounds(&self) -> Result<Vec<(f64, f64)>> {
        self.factors.iter().map(Factor::two_level_bounds).collect()
    }
}

impl Index<usize> for FactorSpec {
    type Output = Factor;

    fn index(&self, index: usize) -> &Self::Output {
        &self.factors[index]
    }
}

impl<'a> IntoIterator for &'a FactorSpec {
    type Item = &'a Factor;
    type IntoIter = std::slice::Iter<'a, Factor>;

    fn into_iter(self) -> Self::IntoIter {
        self.factors.iter()
    }
}
