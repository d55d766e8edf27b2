//! Orthogonal contrast matrix for unreplicated two-level designs.
//!
//! Row 0 is the intercept, rows 1..=k the coded main-effect columns, and the
//! remaining rows are interaction products of increasing order taken in
//! combination order until the matrix is square. Rows are scaled by 1/√n.

use std::fmt;

use ndarray::Array2;
use tracing::debug;

use crate::design::DesignMatrix;
use crate::error::{Error, Result};
use crate::factor::FactorId;
use crate::utils::combinations_by_size;

/// A main effect or interaction estimated by one contrast row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectTerm {
    members: Vec<FactorId>,
    label: String,
    aliases: Vec<String>,
}

impl EffectTerm {
    fn new(members: Vec<FactorId>, names: &[String]) -> Self {
        let label = members
            .iter()
            .map(|id| names[id.0].as_str())
            .collect::<Vec<_>>()
            .join("*");
        Self {
            members,
            label,
            aliases: Vec::new(),
        }
    }

    /// The factors whose product this term is, in column order.
    #[must_use]
    pub fn members(&self) -> &[FactorId] {
        &self.members
    }

    /// Factor names joined by `*`, e.g. `Temp*Enzyme`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Interaction order: 1 for a main effect, 2 for a two-factor interaction, ...
    #[must_use]
    pub fn order(&self) -> usize {
        self.members.len()
    }

    /// Whether this is a main effect.
    #[must_use]
    pub fn is_main_effect(&self) -> bool {
        self.members.len() == 1
    }

    /// Labels of terms whose contrast column is identical (up to sign) to this one.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Whether the term involves the given factor.
    #[must_use]
    pub fn involves(&self, factor: FactorId) -> bool {
        self.members.contains(&factor)
    }
}

impl fmt::Display for EffectTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Normalized n×n contrast matrix and the effect term behind each row.
///
/// # Example
///
/// ```
/// use doe::design::{Design, TwoLevelFullFactorial};
/// use doe::screening::ContrastMatrix;
/// use doe::FactorSpec;
///
/// let spec = FactorSpec::new([("A", vec![0.0, 1.0]), ("B", vec![0.0, 1.0])]).unwrap();
/// let design = TwoLevelFullFactorial.build(&spec).unwrap();
/// let contrasts = ContrastMatrix::new(&design).unwrap();
///
/// let labels: Vec<&str> = contrasts.terms().iter().map(|t| t.label()).collect();
/// assert_eq!(labels, vec!["A", "B", "A*B"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastMatrix {
    terms: Vec<EffectTerm>,
    coded: Array2<i8>,
    matrix: Array2<f64>,
}

impl ContrastMatrix {
    /// Code the design's columns to ±1 and build the contrast matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateDesign`] or [`Error::NotTwoLevel`] if a column
    /// does not hold exactly two distinct values, and
    /// [`Error::NonOrthogonalDesign`] if the main effects are not mutually
    /// orthogonal and balanced or the interactions cannot complete the basis.
    pub fn new(design: &DesignMatrix) -> Result<Self> {
        let coded = code_columns(design)?;
        Self::from_coded(design.names(), &coded)
    }

    /// Build the contrast matrix from an already coded ±1 design.
    ///
    /// # Errors
    ///
    /// See [`ContrastMatrix::new`].
    pub fn from_coded(names: &[String], coded: &Array2<i8>) -> Result<Self> {
        let (n, k) = coded.dim();
        if names.len() != k {
            return Err(Error::DimensionMismatch {
                expected: format!("{k} factor names"),
                actual: format!("{} names", names.len()),
            });
        }
        if n < 2 {
            return Err(Error::InsufficientRuns {
                expected: 2,
                actual: n,
            });
        }

        let mut rows: Vec<Vec<i8>> = vec![vec![1; n]];
        let mut terms: Vec<EffectTerm> = Vec::with_capacity(n - 1);

        for j in 0..k {
            let column = coded.column(j).to_vec();
            if let Some(other) = rows.iter().position(|row| dot(row, &column) != 0) {
                let against = if other == 0 {
                    "the intercept (column is unbalanced)".to_string()
                } else {
                    format!("`{}`", terms[other - 1].label())
                };
                return Err(Error::non_orthogonal(format!(
                    "main effect `{}` is not orthogonal to {against}",
                    names[j]
                )));
            }
            rows.push(column);
            terms.push(EffectTerm::new(vec![FactorId(j)], names));
        }

        for members in combinations_by_size(k, 2) {
            if rows.len() == n {
                break;
            }
            let candidate: Vec<i8> = (0..n)
                .map(|r| members.iter().map(|&j| coded[[r, j]]).product())
                .collect();
            let term = EffectTerm::new(members.into_iter().map(FactorId).collect(), names);

            let mut orthogonal = true;
            for (idx, row) in rows.iter().enumerate() {
                let d = dot(row, &candidate);
                if d.unsigned_abs() as usize == n {
                    orthogonal = false;
                    if idx > 0 {
                        terms[idx - 1].aliases.push(term.label.clone());
                    }
                    debug!(term = %term, aliased_with = idx, "skipping aliased contrast");
                    break;
                } else if d != 0 {
                    orthogonal = false;
                    debug!(term = %term, "skipping non-orthogonal contrast");
                    break;
                }
            }

            if orthogonal {
                rows.push(candidate);
                terms.push(term);
            }
        }

        if rows.len() < n {
            return Err(Error::non_orthogonal(format!(
                "only {} of {} orthogonal contrasts could be formed from {k} factors",
                rows.len() - 1,
                n - 1
            )));
        }

        let scale = 1.0 / (n as f64).sqrt();
        let flat: Vec<i8> = rows.into_iter().flatten().collect();
        let signs = Array2::from_shape_vec((n, n), flat)
            .map_err(|e| Error::invalid_params(e.to_string()))?;
        let matrix = signs.mapv(|v| f64::from(v) * scale);

        Ok(Self {
            terms,
            coded: coded.to_owned(),
            matrix,
        })
    }

    /// Number of runs (and rows of the matrix).
    #[must_use]
    pub fn runs(&self) -> usize {
        self.matrix.nrows()
    }

    /// The effect term of every non-intercept row, in row order.
    #[must_use]
    pub fn terms(&self) -> &[EffectTerm] {
        &self.terms
    }

    /// The normalized n×n matrix, intercept first.
    #[must_use]
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// The coded ±1 design the matrix was built from.
    #[must_use]
    pub fn coded_design(&self) -> &Array2<i8> {
        &self.coded
    }
}

/// Code each column to ±1: its larger value maps to +1, its smaller to -1.
pub(crate) fn code_columns(design: &DesignMatrix) -> Result<Array2<i8>> {
    let mut coded = Array2::zeros((design.runs(), design.factors()));
    for (j, name) in design.names().iter().enumerate() {
        let column = design.column(j);
        let mut distinct: Vec<f64> = column.to_vec();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup();

        match distinct.as_slice() {
            [_, high] => {
                for (r, &v) in column.iter().enumerate() {
                    coded[[r, j]] = if v == *high { 1 } else { -1 };
                }
            }
            [value] => {
                return Err(Error::DegenerateDesign {
                    factor: name.clone(),
                    value: *value,
                })
            }
            other => {
                return Err(Error::NotTwoLevel {
                    factor: name.clone(),
                    distinct: other.len(),
                })
            }
        }
    }
    Ok(coded)
}

fn dot(a: &[i8], b: &[i8]) -> i64 {
    a.iter().zip(b).map(|(&x, &y)| i64::from(x) * i64::from(y)).sum()
}
