//! Hadamard sign tables for Plackett-Burman designs.
//!
//! The Plackett-Burman builder does not construct its sign pattern itself; it
//! asks a [`HadamardTable`] for an n×n table of `+`/`-` symbols. The crate
//! ships [`BuiltinHadamard`], which constructs every supported size locally.
//! Tables served from elsewhere can be wrapped in [`RetryingTable`] (retries
//! transient failures) and [`CachedTable`] (memoizes successful lookups).
//!
//! ```
//! use std::time::Duration;
//! use doe::hadamard::{BuiltinHadamard, CachedTable, HadamardTable, RetryPolicy, RetryingTable};
//!
//! let table = CachedTable::new(RetryingTable::new(
//!     BuiltinHadamard,
//!     RetryPolicy::new(3, Duration::from_millis(10)),
//! ));
//! assert_eq!(table.lookup(16).unwrap().len(), 16);
//! assert_eq!(table.cached(), 1);
//! ```

mod builtin;

pub use builtin::BuiltinHadamard;

use std::collections::HashMap;
use std::time::Duration;

use ndarray::Array2;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::Error;

/// Run counts a Plackett-Burman sign table exists for.
pub const SUPPORTED_RUNS: [usize; 7] = [8, 12, 16, 20, 24, 28, 32];

/// Failure reported by a [`HadamardTable`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The table has no entry for this run count.
    #[error("no Hadamard table for {runs} runs")]
    Unsupported {
        /// The run count looked up.
        runs: usize,
    },

    /// The lookup failed in a way that may succeed when retried.
    #[error("transient failure looking up {runs} runs: {message}")]
    Transient {
        /// The run count looked up.
        runs: usize,
        /// Description of the failure.
        message: String,
    },

    /// The table returned something other than n rows of n `+`/`-` symbols.
    #[error("malformed table for {runs} runs: {message}")]
    Malformed {
        /// The run count looked up.
        runs: usize,
        /// Description of the defect.
        message: String,
    },
}

impl LookupError {
    /// Whether retrying the same lookup could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

impl From<LookupError> for Error {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Unsupported { runs } => Error::unsupported_runs(
                runs,
                format!("supported run counts are {SUPPORTED_RUNS:?}"),
            ),
            LookupError::Transient { runs, message } | LookupError::Malformed { runs, message } => {
                Error::LookupFailed { runs, message }
            }
        }
    }
}

/// Source of `+`/`-` Hadamard sign tables keyed by run count.
pub trait HadamardTable: Send + Sync {
    /// Return `runs` rows of `runs` symbols, each `+` or `-`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Unsupported`] when no table of this size exists.
    fn lookup(&self, runs: usize) -> Result<Vec<String>, LookupError>;
}

impl<T: HadamardTable + ?Sized> HadamardTable for &T {
    fn lookup(&self, runs: usize) -> Result<Vec<String>, LookupError> {
        (**self).lookup(runs)
    }
}

impl<T: HadamardTable + ?Sized> HadamardTable for Box<T> {
    fn lookup(&self, runs: usize) -> Result<Vec<String>, LookupError> {
        (**self).lookup(runs)
    }
}

/// Parse a `+`/`-` table into a coded ±1 matrix, validating its shape.
///
/// # Errors
///
/// Returns [`LookupError::Malformed`] if the table is not `runs` rows of
/// `runs` symbols drawn from `+` and `-`.
///
/// # Example
///
/// ```
/// use doe::hadamard::parse_sign_table;
///
/// let h = parse_sign_table(2, &["++".to_string(), "+-".to_string()]).unwrap();
/// assert_eq!(h[[1, 1]], -1);
/// assert!(parse_sign_table(2, &["++".to_string()]).is_err());
/// ```
pub fn parse_sign_table(runs: usize, rows: &[String]) -> Result<Array2<i8>, LookupError> {
    let malformed = |message: String| LookupError::Malformed { runs, message };

    if rows.len() != runs {
        return Err(malformed(format!("expected {runs} rows, got {}", rows.len())));
    }

    let mut table = Array2::zeros((runs, runs));
    for (i, row) in rows.iter().enumerate() {
        let symbols: Vec<char> = row.trim().chars().collect();
        if symbols.len() != runs {
            return Err(malformed(format!(
                "row {i} has {} symbols, expected {runs}",
                symbols.len()
            )));
        }
        for (j, symbol) in symbols.into_iter().enumerate() {
            table[[i, j]] = match symbol {
                '+' => 1,
                '-' => -1,
                other => {
                    return Err(malformed(format!("unexpected symbol {other:?} in row {i}")));
                }
            };
        }
    }
    Ok(table)
}

/// Render a coded ±1 matrix as `+`/`-` rows.
pub(crate) fn render_sign_table(matrix: &Array2<i8>) -> Vec<String> {
    matrix
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|&v| if v < 0 { '-' } else { '+' }).collect())
        .collect()
}

/// How [`RetryingTable`] retries transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Pause before each retry, multiplied by the attempt number.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Create a policy with the given attempt limit and base backoff.
    #[must_use]
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100))
    }
}

/// Wraps a table and retries [`LookupError::Transient`] failures.
///
/// Non-transient errors are returned immediately. When every attempt fails
/// transiently the last error is returned.
#[derive(Debug, Clone, Default)]
pub struct RetryingTable<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: HadamardTable> RetryingTable<T> {
    /// Wrap `inner` with the given retry policy.
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The retry policy in use.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

impl<T: HadamardTable> HadamardTable for RetryingTable<T> {
    fn lookup(&self, runs: usize) -> Result<Vec<String>, LookupError> {
        let mut attempt = 1;
        loop {
            match self.inner.lookup(runs) {
                Err(err) if err.is_transient() && attempt < self.policy.max_attempts => {
                    warn!(runs, attempt, error = %err, "retrying Hadamard table lookup");
                    std::thread::sleep(self.policy.backoff * attempt);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

/// Wraps a table and memoizes successful lookups by run count.
#[derive(Debug, Default)]
pub struct CachedTable<T> {
    inner: T,
    cache: Mutex<HashMap<usize, Vec<String>>>,
}

impl<T: HadamardTable> CachedTable<T> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached tables.
    pub fn cached(&self) -> usize {
        self.cache.lock().len()
    }

    /// Drop every cached table.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }
}

impl<T: HadamardTable> HadamardTable for CachedTable<T> {
    fn lookup(&self, runs: usize) -> Result<Vec<String>, LookupError> {
        if let Some(rows) = self.cache.lock().get(&runs) {
            debug!(runs, "Hadamard table cache hit");
            return Ok(rows.clone());
        }

        // Not held across the inner lookup, which may block.
        let rows = self.inner.lookup(runs)?;
        self.cache.lock().insert(runs, rows.clone());
        Ok(rows)
    }
}
