//! Python bindings for doe.
//!
//! This module exposes the design builders and the screening function to
//! Python using PyO3. Enable the `python` feature to use this.
//!
//! Factors are passed as a list of `(name, levels)` tuples so their order is
//! explicit on the Python side.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyList;

use crate::design::{self, DesignMatrix};
use crate::error::Error;
use crate::factor::FactorSpec;
use crate::screening::{self, ScreeningConfig};

fn to_py_err(err: Error) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn spec_from(factors: Vec<(String, Vec<f64>)>) -> PyResult<FactorSpec> {
    FactorSpec::new(factors).map_err(to_py_err)
}

/// Python wrapper for DesignMatrix
#[pyclass(name = "Design")]
#[derive(Clone)]
pub struct PyDesign {
    inner: DesignMatrix,
}

#[pymethods]
impl PyDesign {
    /// Create a design from column names and rows.
    #[new]
    fn new(names: Vec<String>, rows: Vec<Vec<f64>>) -> PyResult<Self> {
        let inner = DesignMatrix::from_rows(names, &rows).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Get the number of runs.
    #[getter]
    fn runs(&self) -> usize {
        self.inner.runs()
    }

    /// Get the column names.
    #[getter]
    fn names(&self) -> Vec<String> {
        self.inner.names().to_vec()
    }

    /// Get the data as a list of lists.
    fn data(&self, py: Python<'_>) -> PyResult<PyObject> {
        let list = PyList::empty(py);
        for row in self.inner.rows() {
            let row_list = PyList::empty(py);
            for &value in row {
                row_list.append(value)?;
            }
            list.append(row_list)?;
        }
        Ok(list.into())
    }

    /// Append a response column.
    fn with_response(&self, name: String, values: Vec<f64>) -> PyResult<Self> {
        let inner = self.inner.with_response(name, &values).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn __repr__(&self) -> String {
        format!(
            "Design(runs={}, columns={:?})",
            self.inner.runs(),
            self.inner.names()
        )
    }
}

/// General full factorial over every supplied level.
#[pyfunction]
fn full_factorial(factors: Vec<(String, Vec<f64>)>) -> PyResult<PyDesign> {
    let inner = design::full_factorial(&spec_from(factors)?).map_err(to_py_err)?;
    Ok(PyDesign { inner })
}

/// Two-level full factorial over each factor's two coded levels.
#[pyfunction]
fn full_factorial_2level(factors: Vec<(String, Vec<f64>)>) -> PyResult<PyDesign> {
    let inner = design::two_level_full_factorial(&spec_from(factors)?).map_err(to_py_err)?;
    Ok(PyDesign { inner })
}

/// Two-level fractional factorial with a run budget.
#[pyfunction]
fn fractional_factorial(factors: Vec<(String, Vec<f64>)>, runs: usize) -> PyResult<PyDesign> {
    let inner = design::fractional_factorial(&spec_from(factors)?, runs).map_err(to_py_err)?;
    Ok(PyDesign { inner })
}

/// Plackett-Burman screening design.
#[pyfunction]
fn plackett_burman(factors: Vec<(String, Vec<f64>)>, runs: usize) -> PyResult<PyDesign> {
    let inner = design::plackett_burman(&spec_from(factors)?, runs).map_err(to_py_err)?;
    Ok(PyDesign { inner })
}

/// Box-Behnken design.
#[pyfunction]
fn box_behnken(factors: Vec<(String, Vec<f64>)>) -> PyResult<PyDesign> {
    let inner = design::box_behnken(&spec_from(factors)?).map_err(to_py_err)?;
    Ok(PyDesign { inner })
}

/// Rotatable central composite design.
#[pyfunction]
fn central_composite(factors: Vec<(String, Vec<f64>)>) -> PyResult<PyDesign> {
    let inner = design::central_composite(&spec_from(factors)?).map_err(to_py_err)?;
    Ok(PyDesign { inner })
}

/// Seeded Latin hypercube sample.
#[pyfunction]
#[pyo3(signature = (factors, samples, seed=0))]
fn latin_hypercube(
    factors: Vec<(String, Vec<f64>)>,
    samples: usize,
    seed: u64,
) -> PyResult<PyDesign> {
    let inner = design::latin_hypercube(&spec_from(factors)?, samples, seed).map_err(to_py_err)?;
    Ok(PyDesign { inner })
}

/// Screen a table whose last column is the response.
///
/// Returns `(effect, p_value)` pairs, main effects first.
#[pyfunction]
#[pyo3(signature = (table, trials=10000, seed=0))]
fn fit_two_level_screening(
    table: &PyDesign,
    trials: usize,
    seed: u64,
) -> PyResult<Vec<(String, f64)>> {
    let config = ScreeningConfig::default().with_trials(trials).with_seed(seed);
    let result = screening::screen(&table.inner, &config).map_err(to_py_err)?;
    Ok(result
        .p_values()
        .into_iter()
        .map(|(label, p)| (label.to_string(), p))
        .collect())
}

/// The doe Python module.
#[pymodule]
fn doe(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyDesign>()?;
    m.add_function(wrap_pyfunction!(full_factorial, m)?)?;
    m.add_function(wrap_pyfunction!(full_factorial_2level, m)?)?;
    m.add_function(wrap_pyfunction!(fractional_factorial, m)?)?;
    m.add_function(wrap_pyfunction!(plackett_burman, m)?)?;
    m.add_function(wrap_pyfunction!(box_behnken, m)?)?;
    m.add_function(wrap_pyfunction!(central_composite, m)?)?;
    m.add_function(wrap_pyfunction!(latin_hypercube, m)?)?;
    m.add_function(wrap_pyfunction!(fit_two_level_screening, m)?)?;
    Ok(())
}
