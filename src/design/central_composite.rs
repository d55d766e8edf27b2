//! Central composite response-surface designs.

use ndarray::Array2;
use tracing::debug;

use super::factorial::names;
use super::{standard_signs, Design, DesignMatrix};
use crate::error::{Error, Result};
use crate::factor::FactorSpec;

/// Distance of the axial points from the centre, in coded units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Alpha {
    /// `2^(k/4)`, which makes the prediction variance rotation-invariant.
    #[default]
    Rotatable,
    /// `1`: axial points sit on the faces of the cube.
    FaceCentered,
    /// A caller-supplied positive distance.
    Custom(f64),
}

impl Alpha {
    /// The coded distance for `k` factors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if a custom alpha is not a positive finite number.
    pub fn value(self, k: usize) -> Result<f64> {
        match self {
            Alpha::Rotatable => Ok((k as f64 / 4.0).exp2()),
            Alpha::FaceCentered => Ok(1.0),
            Alpha::Custom(a) if a.is_finite() && a > 0.0 => Ok(a),
            Alpha::Custom(a) => Err(Error::invalid_params(format!(
                "axial distance must be positive and finite, got {a}"
            ))),
        }
    }
}

/// Central composite design: a two-level cube, axial star points and centre runs.
///
/// Row order is the 2^k cube in standard order, then for each factor the
/// `+alpha` and `-alpha` axial points, then `k` centre runs, for
/// `2^k + 2k + k` runs in total. Axial points sit at
/// `mid ± alpha·(high − mid)` with every other factor at mid.
///
/// # Example
///
/// ```
/// use doe::design::{Alpha, CentralComposite, Design};
/// use doe::FactorSpec;
///
/// let spec = FactorSpec::new([("A", vec![-1.0, 1.0]), ("B", vec![0.0, 10.0])]).unwrap();
/// let design = CentralComposite::new().alpha(Alpha::FaceCentered).build(&spec).unwrap();
///
/// assert_eq!(design.runs(), 10);
/// assert_eq!(design.run(4), vec![("A", 1.0), ("B", 5.0)]);
/// assert_eq!(design.run(5), vec![("A", -1.0), ("B", 5.0)]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CentralComposite {
    alpha: Alpha,
}

impl CentralComposite {
    /// Create a rotatable central composite builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the axial distance.
    #[must_use]
    pub fn alpha(mut self, alpha: Alpha) -> Self {
        self.alpha = alpha;
        self
    }
}

impl Design for CentralComposite {
    fn name(&self) -> &'static str {
        "CentralComposite"
    }

    fn run_count(&self, spec: &FactorSpec) -> Result<usize> {
        spec.require_factors(1, self.name())?;
        let k = spec.len();
        u32::try_from(k)
            .ok()
            .and_then(|bits| 1usize.checked_shl(bits))
            .filter(|&cube| cube != 0)
            .and_then(|cube| cube.checked_add(3 * k))
            .ok_or_else(|| Error::invalid_params(format!("2^{k} cube runs overflows")))
    }

    fn build(&self, spec: &FactorSpec) -> Result<DesignMatrix> {
        let runs = self.run_count(spec)?;
        let bounds = spec.two_level_bounds()?;
        let k = spec.len();
        let alpha = self.alpha.value(k)?;
        let mids: Vec<f64> = spec.iter().map(|f| f.mid()).collect();

        let cube = standard_signs(k);
        let mut data = Array2::zeros((runs, k));
        for ((r, c), &sign) in cube.indexed_iter() {
            let (low, high) = bounds[c];
            data[[r, c]] = if sign < 0 { low } else { high };
        }

        // Every non-cube row starts at the centre
        for r in cube.nrows()..runs {
            for c in 0..k {
                data[[r, c]] = mids[c];
            }
        }

        let axial_start = cube.nrows();
        for (c, &(_, high)) in bounds.iter().enumerate() {
            let offset = alpha * (high - mids[c]);
            data[[axial_start + 2 * c, c]] = mids[c] + offset;
            data[[axial_start + 2 * c + 1, c]] = mids[c] - offset;
        }

        debug!(design = self.name(), runs, factors = k, alpha, "built design");
        DesignMatrix::new(names(spec), data)
    }
}
