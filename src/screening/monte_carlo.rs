//! Monte Carlo null distribution of Lenth t-ratios.
//!
//! Each trial draws `m` independent Normal(0, PSE) contrasts, computes their
//! own PSE and t-ratios, and records the t-ratio at every effect position.
//! Trials are grouped into batches; batch `b` draws from
//! `ChaCha8Rng::seed_from_u64(seed)` on stream `b`, so a batch's draws do not
//! depend on which thread runs it or in what order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use super::lenth::{pseudo_standard_error, t_ratios};
use super::pvalue::empirical_p_value;
use super::types::ScreeningConfig;
use crate::error::{Error, Result};

/// Cooperative cancellation signal shared between a caller and a running simulation.
///
/// ```
/// use doe::screening::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn check(token: Option<&Self>) -> Result<()> {
        match token {
            Some(t) if t.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Simulated t-ratios per effect position, each sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct NullDistribution {
    samples: Vec<Vec<f64>>,
    trials: usize,
}

impl NullDistribution {
    /// Merge per-batch trials (each trial a vector of `effects` t-ratios).
    pub(crate) fn from_batches(effects: usize, batches: Vec<Vec<Vec<f64>>>) -> Self {
        let trials: usize = batches.iter().map(Vec::len).sum();
        let mut samples = vec![Vec::with_capacity(trials); effects];
        for trial in batches.into_iter().flatten() {
            for (position, t) in trial.into_iter().enumerate() {
                samples[position].push(t);
            }
        }
        for column in &mut samples {
            column.sort_by(f64::total_cmp);
        }
        Self { samples, trials }
    }

    /// Number of trials.
    #[must_use]
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Number of effect positions.
    #[must_use]
    pub fn effects(&self) -> usize {
        self.samples.len()
    }

    /// Sorted simulated t-ratios for one effect position.
    #[must_use]
    pub fn samples(&self, position: usize) -> &[f64] {
        &self.samples[position]
    }

    /// Empirical p-value of an observed t-ratio at `position`.
    #[must_use]
    pub fn p_value(&self, position: usize, observed: f64) -> f64 {
        empirical_p_value(&self.samples[position], observed)
    }
}

/// Simulate the null distribution sequentially.
///
/// # Errors
///
/// Returns [`Error::InvalidParams`] for an invalid configuration, fewer than
/// two effects or a non-positive `pse`, and [`Error::Cancelled`] if `token`
/// is cancelled before the last batch starts.
///
/// # Example
///
/// ```
/// use doe::screening::{simulate_null, ScreeningConfig};
///
/// let config = ScreeningConfig::default().with_trials(500).with_seed(3);
/// let null = simulate_null(7, 1.0, &config, None).unwrap();
/// assert_eq!(null.trials(), 500);
/// assert_eq!(null.effects(), 7);
/// ```
pub fn simulate_null(
    effects: usize,
    pse: f64,
    config: &ScreeningConfig,
    token: Option<&CancellationToken>,
) -> Result<NullDistribution> {
    let noise = null_noise(effects, pse, config)?;

    let mut batches = Vec::new();
    for (batch, len) in config.batches() {
        CancellationToken::check(token)?;
        batches.push(simulate_batch(batch, len, effects, noise, config.seed));
    }

    debug!(effects, pse, trials = config.trials, "simulated null distribution");
    Ok(NullDistribution::from_batches(effects, batches))
}

/// Validate inputs and build the Normal(0, pse) sampler.
pub(crate) fn null_noise(effects: usize, pse: f64, config: &ScreeningConfig) -> Result<Normal<f64>> {
    config.validate()?;
    if effects < 2 {
        return Err(Error::invalid_params(format!(
            "at least two effects are required, got {effects}"
        )));
    }
    if !(pse > 0.0 && pse.is_finite()) {
        return Err(Error::invalid_params(format!(
            "pseudo standard error must be positive and finite, got {pse}"
        )));
    }
    Normal::new(0.0, pse).map_err(|e| Error::invalid_params(e.to_string()))
}

/// Run `len` trials of batch `batch`.
pub(crate) fn simulate_batch(
    batch: u64,
    len: usize,
    effects: usize,
    noise: Normal<f64>,
    seed: u64,
) -> Vec<Vec<f64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(batch);

    let mut draws = vec![0.0; effects];
    (0..len)
        .map(|_| loop {
            for d in &mut draws {
                *d = noise.sample(&mut rng);
            }
            // A zero simulated PSE has no t-ratios; draw again.
            if let Some(sim_pse) = pseudo_standard_error(&draws) {
                break t_ratios(&draws, sim_pse);
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(trials: usize) -> ScreeningConfig {
        ScreeningConfig::default()
            .with_trials(trials)
            .with_batch_size(100)
            .with_seed(11)
    }

    #[test]
    fn test_shape_and_sorting() {
        let null = simulate_null(7, 2.0, &config(1_000), None).unwrap();
        assert_eq!(null.trials(), 1_000);
        assert_eq!(null.effects(), 7);
        for position in 0..7 {
            let s = null.samples(position);
            assert_eq!(s.len(), 1_000);
            assert!(s.windows(2).all(|w| w[0] <= w[1]));
            assert!(s.iter().all(|&t| t >= 0.0 && t.is_finite()));
        }
    }

    #[test]
    fn test_reproducible() {
        let a = simulate_null(5, 1.0, &config(300), None).unwrap();
        let b = simulate_null(5, 1.0, &config(300), None).unwrap();
        let c = simulate_null(5, 1.0, &config(300).with_seed(12), None).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_pse_scale_free() {
        // Normal(0, s) draws are s * z, so t-ratios do not depend on s
        let a = simulate_null(7, 1.0, &config(200), None).unwrap();
        let b = simulate_null(7, 4.0, &config(200), None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_batches_are_independent_streams() {
        let noise = Normal::new(0.0, 1.0).unwrap();
        let first = simulate_batch(0, 10, 4, noise, 5);
        let second = simulate_batch(1, 10, 4, noise, 5);
        assert_ne!(first, second);
        assert_eq!(first, simulate_batch(0, 10, 4, noise, 5));
    }

    #[test]
    fn test_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(
            simulate_null(7, 1.0, &config(1_000), Some(&token)),
            Err(Error::Cancelled)
        );
    }

    #[test]
    fn test_cancelled_between_batches() {
        // Far more work than can finish before the token flips
        let config = ScreeningConfig::default()
            .with_trials(100_000_000)
            .with_batch_size(1_000);
        let token = CancellationToken::new();

        let result = std::thread::scope(|s| {
            let handle = token.clone();
            s.spawn(move || {
                std::thread::sleep(std::time::Duration::from_millis(50));
                handle.cancel();
            });
            simulate_null(7, 1.0, &config, Some(&token))
        });

        assert_eq!(result, Err(Error::Cancelled));
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(simulate_null(0, 1.0, &config(10), None).is_err());
        assert!(simulate_null(1, 1.0, &config(10), None).is_err());
        assert!(simulate_null(3, 0.0, &config(10), None).is_err());
        assert!(simulate_null(3, f64::NAN, &config(10), None).is_err());
        assert!(simulate_null(3, 1.0, &config(0), None).is_err());
    }

    #[test]
    fn test_null_tail() {
        // With 7 effects, Lenth t-ratios rarely exceed 4 under the null
        let null = simulate_null(7, 1.0, &ScreeningConfig::default(), None).unwrap();
        let p = null.p_value(0, 4.0);
        assert!(p > 0.005 && p < 0.1, "p = {p}");
        assert_eq!(null.p_value(0, 1e6), 1.0 / 10_000.0);
    }
}
