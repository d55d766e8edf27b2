//! Error types for the doe library.
//!
//! This module provides error handling using the `thiserror` crate, with
//! specific variants for factor validation, design construction, the
//! Plackett-Burman table lookup, and effect screening.

use thiserror::Error;

/// The main error type for the doe library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============ Factor Specification Errors ============
    /// A factor was given an unusable name or level set.
    #[error("invalid factor `{factor}`: {message}")]
    InvalidFactorSpec {
        /// Name of the offending factor (empty when the whole spec is at fault).
        factor: String,
        /// Description of what is invalid.
        message: String,
    },

    /// A two-level factor has identical low and high levels.
    #[error("factor `{factor}` is degenerate: low and high levels are both {value}")]
    DegenerateDesign {
        /// Name of the degenerate factor.
        factor: String,
        /// The single value the factor collapses to.
        value: f64,
    },

    // ============ Design Construction Errors ============
    /// A fractional design cannot alias every generated factor onto a distinct
    /// interaction of the base factors.
    #[error(
        "cannot place {factors} factors on a base of {base_factors}: \
         only {available} interaction columns are available"
    )]
    UnachievableResolution {
        /// Total number of factors requested.
        factors: usize,
        /// Number of base (generator) factors.
        base_factors: usize,
        /// Number of distinct base interactions available for aliasing.
        available: usize,
    },

    /// A fractional design would have a lower resolution than required.
    #[error("design resolution {achieved} is below the required resolution {required}")]
    ResolutionTooLow {
        /// Minimum resolution requested by the caller.
        required: usize,
        /// Resolution the design actually achieves.
        achieved: usize,
    },

    /// The design cannot hold the requested number of factors.
    #[error("factors {factors} exceeds maximum {max} for {design} design")]
    TooManyFactors {
        /// Requested number of factors.
        factors: usize,
        /// Maximum allowed factors.
        max: usize,
        /// Name of the design family.
        design: &'static str,
    },

    // ============ Hadamard Lookup Errors ============
    /// No Hadamard table exists for the requested run count.
    #[error("unsupported run count {runs}: {message}")]
    UnsupportedRunCount {
        /// The (rounded) run count that was looked up.
        runs: usize,
        /// Description of why the run count is unsupported.
        message: String,
    },

    /// The Hadamard table collaborator failed or returned a malformed table.
    #[error("Hadamard table lookup for {runs} runs failed: {message}")]
    LookupFailed {
        /// The run count that was looked up.
        runs: usize,
        /// Description of the failure.
        message: String,
    },

    // ============ Screening Errors ============
    /// The response vector does not match the design's run count, or the
    /// design has too few runs to screen.
    #[error("expected {expected} runs, got {actual}")]
    InsufficientRuns {
        /// Run count required (the design's, or the screening minimum).
        expected: usize,
        /// Run count supplied.
        actual: usize,
    },

    /// A screening column does not hold exactly two distinct settings.
    #[error("factor `{factor}` has {distinct} distinct settings; screening needs exactly 2")]
    NotTwoLevel {
        /// Name of the offending column.
        factor: String,
        /// Number of distinct values found in it.
        distinct: usize,
    },

    /// The design does not admit a full orthogonal contrast basis.
    #[error("design is not orthogonal: {message}")]
    NonOrthogonalDesign {
        /// Description of the failure.
        message: String,
    },

    /// Lenth's pseudo standard error is zero, so t-ratios are undefined.
    #[error("pseudo standard error is zero: at least half of the contrasts vanish")]
    ZeroPseudoStandardError,

    /// A Monte Carlo run was cancelled before it completed.
    #[error("operation was cancelled")]
    Cancelled,

    // ============ Parameter Validation Errors ============
    /// Invalid parameters.
    #[error("invalid parameters: {message}")]
    InvalidParams {
        /// Description of what is invalid.
        message: String,
    },

    /// Array dimensions are inconsistent.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension description.
        expected: String,
        /// Actual dimension description.
        actual: String,
    },
}

/// A specialized `Result` type for doe operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Create a new `InvalidParams` error.
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Create a new `InvalidFactorSpec` error.
    #[must_use]
    pub fn invalid_factor(factor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFactorSpec {
            factor: factor.into(),
            message: message.into(),
        }
    }

    /// Create a new `NonOrthogonalDesign` error.
    #[must_use]
    pub fn non_orthogonal(message: impl Into<String>) -> Self {
        Self::NonOrthogonalDesign {
            message: message.into(),
        }
    }

    /// Create a new `UnsupportedRunCount` error.
    #[must_use]
    pub fn unsupported_runs(runs: usize, message: impl Into<String>) -> Self {
        Self::UnsupportedRunCount {
            runs,
            message: message.into(),
        }
    }
}
