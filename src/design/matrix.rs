//! The design matrix value type.

use ndarray::{Array2, ArrayView1, Axis};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A row-ordered table of runs with one named column per factor.
///
/// Values are in each factor's natural units. Column order is the factor
/// order of the [`FactorSpec`](crate::FactorSpec) the design was built from.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DesignMatrix {
    /// Column names.
    names: Vec<String>,
    /// The run data, shape (runs, columns).
    data: Array2<f64>,
}

impl DesignMatrix {
    /// Create a design matrix, validating that names match the column count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the number of names differs
    /// from the number of columns, or [`Error::InvalidParams`] on duplicate names.
    pub fn new(names: Vec<String>, data: Array2<f64>) -> Result<Self> {
        if names.len() != data.ncols() {
            return Err(Error::DimensionMismatch {
                expected: format!("{} columns", names.len()),
                actual: format!("{} columns", data.ncols()),
            });
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(Error::invalid_params(format!(
                    "duplicate column name `{name}`"
                )));
            }
        }
        Ok(Self { names, data })
    }

    /// Build a design matrix from row vectors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if any row has the wrong length.
    pub fn from_rows(names: Vec<String>, rows: &[Vec<f64>]) -> Result<Self> {
        let cols = names.len();
        let mut flat = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(Error::DimensionMismatch {
                    expected: format!("{cols} values in run {i}"),
                    actual: format!("{} values", row.len()),
                });
            }
            flat.extend_from_slice(row);
        }
        let data = Array2::from_shape_vec((rows.len(), cols), flat).map_err(|e| {
            Error::DimensionMismatch {
                expected: format!("{} x {cols}", rows.len()),
                actual: e.to_string(),
            }
        })?;
        Self::new(names, data)
    }

    /// Number of runs (rows).
    #[must_use]
    pub fn runs(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns.
    #[must_use]
    pub fn factors(&self) -> usize {
        self.data.ncols()
    }

    /// Column names in order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Get a reference to the underlying data.
    #[must_use]
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Consume the design and return the underlying data.
    #[must_use]
    pub fn into_data(self) -> Array2<f64> {
        self.data
    }

    /// Value at a specific run and column.
    ///
    /// # Panics
    ///
    /// Panics if the indices are out of bounds.
    #[must_use]
    pub fn get(&self, run: usize, col: usize) -> f64 {
        self.data[[run, col]]
    }

    /// A column by position.
    #[must_use]
    pub fn column(&self, idx: usize) -> ArrayView1<'_, f64> {
        self.data.column(idx)
    }

    /// A column by name.
    #[must_use]
    pub fn column_by_name(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.data.column(idx))
    }

    /// One run as `(name, value)` pairs in column order.
    #[must_use]
    pub fn run(&self, idx: usize) -> Vec<(&str, f64)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.data.row(idx).iter().copied())
            .collect()
    }

    /// Iterate over runs.
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.data.rows().into_iter()
    }

    /// Return a copy with an appended response column.
    ///
    /// The response becomes the last column, which is where
    /// [`screen`](crate::screening::screen) expects it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientRuns`] if `values` does not have one
    /// entry per run, or [`Error::InvalidParams`] if the name is taken.
    pub fn with_response(&self, name: impl Into<String>, values: &[f64]) -> Result<Self> {
        if values.len() != self.runs() {
            return Err(Error::InsufficientRuns {
                expected: self.runs(),
                actual: values.len(),
            });
        }
        let column = ArrayView1::from(values).insert_axis(Axis(1));
        let data = ndarray::concatenate(Axis(1), &[self.data.view(), column])
            .map_err(|e| Error::invalid_params(e.to_string()))?;

        let mut names = self.names.clone();
        names.push(name.into());
        Self::new(names, data)
    }

    /// Split off the last column, returning the remaining design and the column values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if the table has fewer than two columns.
    pub fn split_response(&self) -> Result<(Self, Vec<f64>)> {
        if self.factors() < 2 {
            return Err(Error::invalid_params(
                "a screening table needs at least one factor column and a response column",
            ));
        }
        let last = self.factors() - 1;
        let response = self.data.column(last).to_vec();
        let design = self.data.select(Axis(1), &(0..last).collect::<Vec<_>>());
        Ok((Self::new(self.names[..last].to_vec(), design)?, response))
    }
}

impl fmt::Debug for DesignMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DesignMatrix {:?} with data {:?}", self.names, self.data)
    }
}

impl fmt::Display for DesignMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {}", self.names.join(" "))?;
        for row in self.data.rows() {
            let row_str: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "  {}", row_str.join(" "))?;
        }
        Ok(())
    }
}
