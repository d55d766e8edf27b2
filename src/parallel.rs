//! Parallel Monte Carlo screening.
//!
//! This module provides parallel versions of the null-distribution simulation
//! using Rayon. Enable with the `parallel` feature flag.
//!
//! Batches are seeded exactly as in the sequential path (batch `b` uses
//! stream `b` of the configured seed) and collected in batch order, so
//! [`par_screen`] returns the same result as
//! [`screen_responses`](crate::screening::screen_responses) for the same
//! configuration, whatever the thread count.
//!
//! # Usage
//!
//! ```
//! use doe::design::{Design, TwoLevelFullFactorial};
//! use doe::parallel::par_screen;
//! use doe::screening::ScreeningConfig;
//! use doe::FactorSpec;
//!
//! let spec = FactorSpec::new([
//!     ("A", vec![0.0, 1.0]),
//!     ("B", vec![0.0, 1.0]),
//!     ("C", vec![0.0, 1.0]),
//! ])
//! .unwrap();
//! let design = TwoLevelFullFactorial.build(&spec).unwrap();
//! let responses = [60.0, 52.0, 54.0, 45.0, 72.0, 83.0, 68.0, 80.0];
//!
//! let result = par_screen(&design, &responses, &ScreeningConfig::default()).unwrap();
//! assert_eq!(result.ranked()[0].label(), "A");
//! ```
//!
//! # Performance
//!
//! Parallelism pays off once there are several batches per core; with the
//! default 10000 trials in batches of 1000 there are ten units of work.

use rayon::prelude::*;
use tracing::debug;

use crate::design::DesignMatrix;
use crate::error::Result;
use crate::screening::{
    null_noise, simulate_batch, CancellationToken, NullDistribution, Observed, ScreeningConfig,
    ScreeningResult,
};

/// Simulate the null distribution with batches spread across the Rayon pool.
///
/// # Errors
///
/// Same as [`simulate_null`](crate::screening::simulate_null).
pub fn par_simulate_null(
    effects: usize,
    pse: f64,
    config: &ScreeningConfig,
    token: Option<&CancellationToken>,
) -> Result<NullDistribution> {
    let noise = null_noise(effects, pse, config)?;

    let batches: Vec<Vec<Vec<f64>>> = config
        .batches()
        .into_par_iter()
        .map(|(batch, len)| {
            CancellationToken::check(token)?;
            Ok(simulate_batch(batch, len, effects, noise, config.seed))
        })
        .collect::<Result<_>>()?;

    // A batch that started before cancellation may still have finished.
    CancellationToken::check(token)?;

    debug!(effects, pse, trials = config.trials, "simulated null distribution in parallel");
    Ok(NullDistribution::from_batches(effects, batches))
}

/// Parallel counterpart of [`screen_responses`](crate::screening::screen_responses).
///
/// # Errors
///
/// Same as [`screen_responses`](crate::screening::screen_responses).
pub fn par_screen(
    design: &DesignMatrix,
    responses: &[f64],
    config: &ScreeningConfig,
) -> Result<ScreeningResult> {
    let observed = Observed::new(design, responses)?;
    let null = par_simulate_null(observed.t_ratios.len(), observed.pse, config, None)?;
    Ok(observed.into_result(&null))
}

/// Parallel counterpart of [`screen_cancellable`](crate::screening::screen_cancellable).
///
/// # Errors
///
/// Returns [`Error::Cancelled`](crate::Error::Cancelled) if the token is
/// cancelled before the simulation finishes.
pub fn par_screen_cancellable(
    design: &DesignMatrix,
    responses: &[f64],
    config: &ScreeningConfig,
    token: &CancellationToken,
) -> Result<ScreeningResult> {
    let observed = Observed::new(design, responses)?;
    let null = par_simulate_null(observed.t_ratios.len(), observed.pse, config, Some(token))?;
    Ok(observed.into_result(&null))
}
