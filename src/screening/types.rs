//! Screening configuration and result types.

use std::fmt;

use super::contrast::EffectTerm;
use crate::error::{Error, Result};

/// Configuration for effect screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreeningConfig {
    /// Number of Monte Carlo trials in the null distribution (default: 10000).
    pub trials: usize,
    /// Seed for the Monte Carlo random source (default: 0).
    pub seed: u64,
    /// Trials per batch; cancellation is checked between batches (default: 1000).
    pub batch_size: usize,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            trials: 10_000,
            seed: 0,
            batch_size: 1_000,
        }
    }
}

impl ScreeningConfig {
    /// Set the number of trials.
    #[must_use]
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Check that trials and batch size are positive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] otherwise.
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(Error::invalid_params("trials must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(Error::invalid_params("batch_size must be at least 1"));
        }
        Ok(())
    }

    /// `(batch index, trials in batch)` for every batch, in order.
    pub(crate) fn batches(&self) -> Vec<(u64, usize)> {
        (0..self.trials)
            .step_by(self.batch_size)
            .enumerate()
            .map(|(b, start)| (b as u64, self.batch_size.min(self.trials - start)))
            .collect()
    }
}

/// Screening outcome for a single effect term.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    /// The main effect or interaction.
    pub term: EffectTerm,
    /// Normalized contrast value.
    pub contrast: f64,
    /// `|contrast| / PSE`.
    pub t_ratio: f64,
    /// Empirical p-value from the simulated null distribution.
    pub p_value: f64,
}

impl Effect {
    /// The term's label, e.g. `Temp*Enzyme`.
    #[must_use]
    pub fn label(&self) -> &str {
        self.term.label()
    }
}

/// Result of screening an unreplicated two-level experiment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreeningResult {
    /// One entry per contrast, main effects first, then interactions by order.
    pub effects: Vec<Effect>,
    /// Lenth's pseudo standard error of the observed contrasts.
    pub pse: f64,
    /// Number of Monte Carlo trials behind each p-value.
    pub trials: usize,
}

impl ScreeningResult {
    /// `(label, p-value)` pairs in effect order.
    #[must_use]
    pub fn p_values(&self) -> Vec<(&str, f64)> {
        self.effects.iter().map(|e| (e.label(), e.p_value)).collect()
    }

    /// Look up an effect by label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Effect> {
        self.effects.iter().find(|e| e.label() == label)
    }

    /// Effects sorted by ascending p-value; ties keep effect order.
    #[must_use]
    pub fn ranked(&self) -> Vec<&Effect> {
        let mut ranked: Vec<&Effect> = self.effects.iter().collect();
        ranked.sort_by(|a, b| a.p_value.total_cmp(&b.p_value));
        ranked
    }

    /// Effects with a p-value below `alpha`, most significant first.
    #[must_use]
    pub fn significant(&self, alpha: f64) -> Vec<&Effect> {
        self.ranked()
            .into_iter()
            .filter(|e| e.p_value < alpha)
            .collect()
    }
}

impl fmt::Display for ScreeningResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .effects
            .iter()
            .map(|e| e.label().len())
            .max()
            .unwrap_or(0)
            .max("Effect".len());

        writeln!(f, "{:<width$}  Individual p-Value", "Effect")?;
        for effect in &self.effects {
            writeln!(f, "{:<width$}  {:.6}", effect.label(), effect.p_value)?;
        }
        Ok(())
    }
}
