//! Effect contrasts and Lenth's pseudo standard error.
//!
//! ```text
//! s0  = 1.5 · median |c_i|
//! PSE = 1.5 · median { |c_i| : |c_i| < 2.5 · s0 }
//! t_i = |c_i| / PSE
//! ```

use crate::error::{Error, Result};
use crate::utils::median;

use super::contrast::ContrastMatrix;

/// Project the responses onto the contrast matrix, dropping the intercept.
///
/// Returns one contrast per effect term, in term order.
///
/// # Errors
///
/// Returns [`Error::InsufficientRuns`] if there is not one response per run,
/// or [`Error::InvalidParams`] if a response is not finite.
pub fn contrasts(matrix: &ContrastMatrix, responses: &[f64]) -> Result<Vec<f64>> {
    let n = matrix.runs();
    if responses.len() != n {
        return Err(Error::InsufficientRuns {
            expected: n,
            actual: responses.len(),
        });
    }
    if let Some(bad) = responses.iter().position(|y| !y.is_finite()) {
        return Err(Error::invalid_params(format!(
            "response for run {bad} is not a finite number"
        )));
    }

    Ok(matrix
        .matrix()
        .rows()
        .into_iter()
        .skip(1)
        .map(|row| row.iter().zip(responses).map(|(m, y)| m * y).sum())
        .collect())
}

/// Lenth's pseudo standard error, or `None` when it is zero or undefined.
///
/// It is undefined when no contrast survives trimming, which happens when at
/// least half the contrasts are exactly zero.
#[must_use]
pub fn pseudo_standard_error(contrasts: &[f64]) -> Option<f64> {
    let magnitudes: Vec<f64> = contrasts.iter().map(|c| c.abs()).collect();
    let s0 = 1.5 * median(&magnitudes)?;

    let trimmed: Vec<f64> = magnitudes.into_iter().filter(|&c| c < 2.5 * s0).collect();
    let pse = 1.5 * median(&trimmed)?;

    (pse > 0.0 && pse.is_finite()).then_some(pse)
}

/// [`pseudo_standard_error`] as a `Result`.
///
/// # Errors
///
/// Returns [`Error::ZeroPseudoStandardError`] when the PSE is zero or undefined.
pub fn require_pse(contrasts: &[f64]) -> Result<f64> {
    pseudo_standard_error(contrasts).ok_or(Error::ZeroPseudoStandardError)
}

/// Standardized effects `|c_i| / pse`.
#[must_use]
pub fn t_ratios(contrasts: &[f64], pse: f64) -> Vec<f64> {
    contrasts.iter().map(|c| c.abs() / pse).collect()
}
