//! Effect screening for unreplicated two-level experiments.
//!
//! The pipeline codes the design to ±1, builds an orthogonal contrast matrix
//! over main effects and interactions, projects the responses onto it,
//! standardizes the contrasts with Lenth's pseudo standard error, and turns
//! each t-ratio into an empirical p-value against a Monte Carlo null
//! distribution.
//!
//! ## Quick Start
//!
//! ```
//! use doe::design::{Design, TwoLevelFullFactorial};
//! use doe::screening::{screen, ScreeningConfig};
//! use doe::FactorSpec;
//!
//! let spec = FactorSpec::new([
//!     ("Temp", vec![50.0, 25.0]),
//!     ("Concentration", vec![0.4, 0.6]),
//!     ("Enzyme", vec![-1.0, 1.0]),
//! ])
//! .unwrap();
//!
//! let table = TwoLevelFullFactorial
//!     .build(&spec)
//!     .unwrap()
//!     .with_response("Yield", &[60.0, 52.0, 54.0, 45.0, 72.0, 83.0, 68.0, 80.0])
//!     .unwrap();
//!
//! let result = screen(&table, &ScreeningConfig::default()).unwrap();
//! let ranked = result.ranked();
//! assert_eq!(ranked[0].label(), "Temp");
//! assert_eq!(ranked[1].label(), "Temp*Enzyme");
//! println!("{result}");
//! ```
//!
//! ## Method
//!
//! With `n` runs there are `m = n - 1` contrasts. Lenth's PSE is a robust
//! noise scale that ignores the largest contrasts, so real effects do not
//! inflate it. The null distribution is simulated rather than taken from a
//! t table: every trial draws `m` Normal(0, PSE) contrasts and records their
//! own Lenth t-ratios.

mod contrast;
mod lenth;
mod monte_carlo;
mod pvalue;
mod types;

pub use contrast::{ContrastMatrix, EffectTerm};
pub use crate::factor::FactorId;
pub use lenth::{contrasts, pseudo_standard_error, require_pse, t_ratios};
pub use monte_carlo::{simulate_null, CancellationToken, NullDistribution};
pub use pvalue::empirical_p_value;
pub use types::{Effect, ScreeningConfig, ScreeningResult};

#[cfg(feature = "parallel")]
pub(crate) use monte_carlo::{null_noise, simulate_batch};

use tracing::debug;

use crate::design::DesignMatrix;
use crate::error::Result;

/// Screen a table whose last column is the response.
///
/// # Errors
///
/// Returns an error if the table has no factor columns or fewer than
/// [`MIN_SCREENING_RUNS`] runs, a factor column is not two-level, the design
/// is not orthogonal, or the PSE is zero.
pub fn screen(table: &DesignMatrix, config: &ScreeningConfig) -> Result<ScreeningResult> {
    let (design, responses) = table.split_response()?;
    screen_responses(&design, &responses, config)
}

/// Screen a design against a separate response vector.
///
/// # Errors
///
/// Returns [`Error::InsufficientRuns`](crate::Error::InsufficientRuns) when
/// the response count differs from the run count, plus everything
/// [`screen`] can return.
pub fn screen_responses(
    design: &DesignMatrix,
    responses: &[f64],
    config: &ScreeningConfig,
) -> Result<ScreeningResult> {
    let observed = Observed::new(design, responses)?;
    let null = simulate_null(observed.t_ratios.len(), observed.pse, config, None)?;
    Ok(observed.into_result(&null))
}

/// Like [`screen_responses`], checking `token` between Monte Carlo batches.
///
/// # Errors
///
/// Returns [`Error::Cancelled`](crate::Error::Cancelled) if the token is
/// cancelled before the simulation finishes.
pub fn screen_cancellable(
    design: &DesignMatrix,
    responses: &[f64],
    config: &ScreeningConfig,
    token: &CancellationToken,
) -> Result<ScreeningResult> {
    let observed = Observed::new(design, responses)?;
    let null = simulate_null(observed.t_ratios.len(), observed.pse, config, Some(token))?;
    Ok(observed.into_result(&null))
}

/// Fewest runs a screening design may have: Lenth's PSE needs two contrasts.
pub const MIN_SCREENING_RUNS: usize = 3;

/// Contrasts, PSE and t-ratios of the observed responses.
pub(crate) struct Observed {
    pub(crate) terms: Vec<EffectTerm>,
    pub(crate) contrasts: Vec<f64>,
    pub(crate) pse: f64,
    pub(crate) t_ratios: Vec<f64>,
}

impl Observed {
    pub(crate) fn new(design: &DesignMatrix, responses: &[f64]) -> Result<Self> {
        if responses.len() != design.runs() {
            return Err(crate::Error::InsufficientRuns {
                expected: design.runs(),
                actual: responses.len(),
            });
        }
        if design.runs() < MIN_SCREENING_RUNS {
            return Err(crate::Error::InsufficientRuns {
                expected: MIN_SCREENING_RUNS,
                actual: design.runs(),
            });
        }
        let matrix = ContrastMatrix::new(design)?;
        let contrasts = contrasts(&matrix, responses)?;
        let pse = require_pse(&contrasts)?;
        let t_ratios = t_ratios(&contrasts, pse);

        debug!(runs = design.runs(), effects = contrasts.len(), pse, "observed contrasts");
        Ok(Self {
            terms: matrix.terms().to_vec(),
            contrasts,
            pse,
            t_ratios,
        })
    }

    pub(crate) fn into_result(self, null: &NullDistribution) -> ScreeningResult {
        let effects = self
            .terms
            .into_iter()
            .zip(self.contrasts)
            .zip(self.t_ratios)
            .enumerate()
            .map(|(position, ((term, contrast), t_ratio))| Effect {
                term,
                contrast,
                t_ratio,
                p_value: null.p_value(position, t_ratio),
            })
            .collect();

        ScreeningResult {
            effects,
            pse: self.pse,
            trials: null.trials(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{Design, FractionalFactorial, TwoLevelFullFactorial};
    use crate::error::Error;
    use crate::factor::FactorSpec;

    const YIELDS: [f64; 8] = [60.0, 52.0, 54.0, 45.0, 72.0, 83.0, 68.0, 80.0];

    fn enzyme_design() -> DesignMatrix {
        let spec = FactorSpec::new([
            ("Temp", vec![50.0, 25.0]),
            ("Concentration", vec![0.4, 0.6]),
            ("Enzyme", vec![-1.0, 1.0]),
        ])
        .unwrap();
        TwoLevelFullFactorial.build(&spec).unwrap()
    }

    fn p(result: &ScreeningResult, label: &str) -> f64 {
        result.get(label).unwrap().p_value
    }

    #[test]
    fn test_enzyme_experiment() {
        let table = enzyme_design().with_response("Yield", &YIELDS).unwrap();
        let result = screen(&table, &ScreeningConfig::default()).unwrap();

        assert_eq!(result.trials, 10_000);
        assert_eq!(result.effects.len(), 7);
        assert!((result.pse - 9.0 / 8f64.sqrt()).abs() < 1e-9);

        let temp = result.get("Temp").unwrap();
        assert!((temp.contrast + 92.0 / 8f64.sqrt()).abs() < 1e-9);
        assert!((temp.t_ratio - 92.0 / 9.0).abs() < 1e-9);
        let temp_enzyme = result.get("Temp*Enzyme").unwrap();
        assert!((temp_enzyme.contrast + 40.0 / 8f64.sqrt()).abs() < 1e-9);

        let ranked: Vec<&str> = result.ranked().iter().map(|e| e.label()).collect();
        assert_eq!(&ranked[..2], &["Temp", "Temp*Enzyme"]);
        assert!(p(&result, "Temp") < p(&result, "Temp*Enzyme"));

        assert!(p(&result, "Temp") < 0.01);
        let te = p(&result, "Temp*Enzyme");
        assert!(te > 0.005 && te < 0.03, "Temp*Enzyme p = {te}");
        let conc = p(&result, "Concentration");
        assert!(conc > 0.03 && conc < 0.1, "Concentration p = {conc}");
        assert!(p(&result, "Concentration*Enzyme") > 0.99);

        let significant: Vec<&str> = result.significant(0.04).iter().map(|e| e.label()).collect();
        assert_eq!(significant, vec!["Temp", "Temp*Enzyme"]);
    }

    #[test]
    fn test_p_values_in_range() {
        let config = ScreeningConfig::default().with_trials(2_000).with_seed(4);
        let result = screen_responses(&enzyme_design(), &YIELDS, &config).unwrap();
        let min = 1.0 / 2_000.0;
        for (label, p) in result.p_values() {
            assert!((min..=1.0).contains(&p), "{label}: {p}");
        }
    }

    #[test]
    fn test_scale_invariance() {
        let config = ScreeningConfig::default().with_trials(3_000).with_seed(21);
        let doubled: Vec<f64> = YIELDS.iter().map(|y| y * 2.0).collect();

        let a = screen_responses(&enzyme_design(), &YIELDS, &config).unwrap();
        let b = screen_responses(&enzyme_design(), &doubled, &config).unwrap();

        assert_eq!(b.pse, 2.0 * a.pse);
        for (x, y) in a.effects.iter().zip(&b.effects) {
            assert_eq!(x.t_ratio, y.t_ratio, "{}", x.label());
            assert_eq!(x.p_value, y.p_value, "{}", x.label());
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = ScreeningConfig::default().with_trials(1_000).with_seed(8);
        let a = screen_responses(&enzyme_design(), &YIELDS, &config).unwrap();
        let b = screen_responses(&enzyme_design(), &YIELDS, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_response_length_mismatch() {
        assert_eq!(
            screen_responses(&enzyme_design(), &YIELDS[..6], &ScreeningConfig::default()),
            Err(Error::InsufficientRuns {
                expected: 8,
                actual: 6
            })
        );
    }

    #[test]
    fn test_single_effect_rejected() {
        let design =
            DesignMatrix::from_rows(vec!["A".into()], &[vec![-1.0], vec![1.0]]).unwrap();
        assert_eq!(
            screen_responses(&design, &[1.0, 1.001], &ScreeningConfig::default()),
            Err(Error::InsufficientRuns {
                expected: MIN_SCREENING_RUNS,
                actual: 2
            })
        );
    }

    #[test]
    fn test_zero_pse() {
        // Only Temp moves the response, so six of seven contrasts vanish
        let flat = [10.0, 10.0, 10.0, 10.0, 20.0, 20.0, 20.0, 20.0];
        assert_eq!(
            screen_responses(&enzyme_design(), &flat, &ScreeningConfig::default()),
            Err(Error::ZeroPseudoStandardError)
        );
    }

    #[test]
    fn test_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(
            screen_cancellable(&enzyme_design(), &YIELDS, &ScreeningConfig::default(), &token),
            Err(Error::Cancelled)
        );

        let live = CancellationToken::new();
        let config = ScreeningConfig::default().with_trials(500);
        assert!(screen_cancellable(&enzyme_design(), &YIELDS, &config, &live).is_ok());
    }

    #[test]
    fn test_fractional_design_screening() {
        let spec = FactorSpec::new((0..5).map(|i| (crate::utils::factor_letter(i), vec![-1.0, 1.0])))
            .unwrap();
        let design = FractionalFactorial::new(16).build(&spec).unwrap();
        let responses: Vec<f64> = (0..16)
            .map(|r| {
                let a = design.get(r, 0);
                let noise = [0.3, -0.2, 0.1, -0.4, 0.2, 0.0, -0.1, 0.5];
                50.0 + 12.0 * a + noise[r % 8] * (r / 8 + 1) as f64
            })
            .collect();

        let config = ScreeningConfig::default().with_trials(2_000);
        let result = screen_responses(&design, &responses, &config).unwrap();
        assert_eq!(result.effects.len(), 15);
        assert_eq!(result.ranked()[0].label(), "A");
    }

    #[test]
    fn test_display() {
        let config = ScreeningConfig::default().with_trials(500);
        let result = screen_responses(&enzyme_design(), &YIELDS, &config).unwrap();
        let text = result.to_string();
        assert!(text.lines().next().unwrap().contains("Individual p-Value"));
        assert_eq!(text.lines().count(), 8);
        assert!(text.contains("Temp*Concentration*Enzyme"));
    }

    #[test]
    fn test_not_two_level() {
        let design = DesignMatrix::from_rows(
            vec!["A".into()],
            &[vec![0.0], vec![1.0], vec![2.0], vec![1.0]],
        )
        .unwrap();
        assert!(matches!(
            screen_responses(&design, &[1.0, 2.0, 3.0, 4.0], &ScreeningConfig::default()),
            Err(Error::NotTwoLevel { .. })
        ));
    }
}
