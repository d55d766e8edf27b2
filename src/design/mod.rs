//! Experimental design builders.
//!
//! Every builder turns a [`FactorSpec`] into a [`DesignMatrix`] in the
//! factors' natural units.
//!
//! ## Available Designs
//!
//! | Design | Runs | Levels used |
//! |--------|------|-------------|
//! | [`FullFactorial`] | ∏ \|levels\| | every supplied level |
//! | [`TwoLevelFullFactorial`] | 2^k | two coded levels |
//! | [`FractionalFactorial`] | 2^⌊log2 R⌋ | two coded levels |
//! | [`PlackettBurman`] | R rounded up to a multiple of 4 | two coded levels |
//! | [`BoxBehnken`] | 4·C(k,2) + k | low, mid, high |
//! | [`CentralComposite`] | 2^k + 2k + k | low, high, mid, axial |
//! | [`LatinHypercube`] | n | continuous in \[low, high\] |
//!
//! The two coded levels are a factor's supplied levels, in supplied order,
//! when exactly two are given, and its low and high otherwise
//! (see [`Factor::coded_levels`](crate::Factor::coded_levels)).
//!
//! ## Usage
//!
//! All builders implement the [`Design`] trait:
//!
//! ```
//! use doe::design::{Design, TwoLevelFullFactorial};
//! use doe::FactorSpec;
//!
//! let spec = FactorSpec::new([
//!     ("Height", vec![1.6, 2.0]),
//!     ("Width", vec![0.2, 0.4]),
//!     ("Depth", vec![0.2, 0.3]),
//! ])
//! .unwrap();
//!
//! let design = TwoLevelFullFactorial.build(&spec).unwrap();
//! assert_eq!(design.runs(), 8);
//! assert_eq!(design.run(1), vec![("Height", 1.6), ("Width", 0.2), ("Depth", 0.3)]);
//! ```

mod box_behnken;
mod central_composite;
mod factorial;
mod fractional;
mod latin_hypercube;
mod matrix;
mod plackett_burman;

pub use box_behnken::BoxBehnken;
pub use central_composite::{Alpha, CentralComposite};
pub use factorial::{FullFactorial, TwoLevelFullFactorial};
pub use fractional::{FractionalFactorial, FractionalPlan, Generator};
pub use latin_hypercube::{LatinHypercube, LhsKind};
pub use matrix::DesignMatrix;
pub use plackett_burman::PlackettBurman;

pub(crate) use factorial::{sign_matrix, standard_signs};

use crate::error::Result;
use crate::factor::FactorSpec;

/// Trait for experimental design builders.
///
/// Builders hold only their own parameters; nothing is retained between
/// calls to [`build`](Design::build).
pub trait Design: Send + Sync {
    /// Get the name of this design family.
    fn name(&self) -> &'static str;

    /// Number of runs the design has for the given factors.
    ///
    /// # Errors
    ///
    /// Returns an error when no design exists for these factors.
    fn run_count(&self, spec: &FactorSpec) -> Result<usize>;

    /// Build the design matrix for the given factors.
    ///
    /// # Errors
    ///
    /// Returns an error if the factors do not satisfy the design's
    /// requirements.
    fn build(&self, spec: &FactorSpec) -> Result<DesignMatrix>;
}

/// General full factorial over every supplied level.
///
/// # Errors
///
/// See [`FullFactorial`].
pub fn full_factorial(spec: &FactorSpec) -> Result<DesignMatrix> {
    FullFactorial.build(spec)
}

/// Two-level full factorial over each factor's two coded levels.
///
/// # Errors
///
/// See [`TwoLevelFullFactorial`].
pub fn two_level_full_factorial(spec: &FactorSpec) -> Result<DesignMatrix> {
    TwoLevelFullFactorial.build(spec)
}

/// Two-level fractional factorial with a run budget.
///
/// # Errors
///
/// See [`FractionalFactorial`].
pub fn fractional_factorial(spec: &FactorSpec, runs: usize) -> Result<DesignMatrix> {
    FractionalFactorial::new(runs).build(spec)
}

/// Plackett-Burman screening design using the built-in Hadamard table.
///
/// # Errors
///
/// See [`PlackettBurman`].
pub fn plackett_burman(spec: &FactorSpec, runs: usize) -> Result<DesignMatrix> {
    PlackettBurman::new(runs).build(spec)
}

/// Box-Behnken response-surface design.
///
/// # Errors
///
/// See [`BoxBehnken`].
pub fn box_behnken(spec: &FactorSpec) -> Result<DesignMatrix> {
    BoxBehnken.build(spec)
}

/// Rotatable central composite design.
///
/// # Errors
///
/// See [`CentralComposite`].
pub fn central_composite(spec: &FactorSpec) -> Result<DesignMatrix> {
    CentralComposite::new().build(spec)
}

/// Seeded Latin hypercube sample.
///
/// # Errors
///
/// See [`LatinHypercube`].
pub fn latin_hypercube(spec: &FactorSpec, samples: usize, seed: u64) -> Result<DesignMatrix> {
    LatinHypercube::new(samples, seed).build(spec)
}
