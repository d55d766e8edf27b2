//! Locally constructed Hadamard matrices for the Plackett-Burman sizes.
//!
//! | Order | Construction |
//! |-------|--------------|
//! | 8, 16, 32 | Sylvester doubling |
//! | 12, 20, 24 | Paley I, p = 11, 19, 23 (p ≡ 3 mod 4) |
//! | 28 | Paley II, q = 13 (q ≡ 1 mod 4) |
//!
//! Every matrix is normalized so its first row and first column are all +1.

use ndarray::Array2;

use super::{render_sign_table, HadamardTable, LookupError, SUPPORTED_RUNS};
use crate::utils::{is_prime, mod_pow};

/// Hadamard table built in-process, no I/O.
///
/// # Example
///
/// ```
/// use doe::hadamard::{BuiltinHadamard, HadamardTable};
///
/// let rows = BuiltinHadamard.lookup(12).unwrap();
/// assert_eq!(rows.len(), 12);
/// assert!(rows[0].chars().all(|c| c == '+'));
/// assert!(BuiltinHadamard.lookup(36).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinHadamard;

impl HadamardTable for BuiltinHadamard {
    fn lookup(&self, runs: usize) -> Result<Vec<String>, LookupError> {
        let matrix = hadamard_matrix(runs).ok_or(LookupError::Unsupported { runs })?;
        Ok(render_sign_table(&matrix))
    }
}

/// Build the normalized Hadamard matrix of the given order, if supported.
pub(crate) fn hadamard_matrix(n: usize) -> Option<Array2<i8>> {
    if !SUPPORTED_RUNS.contains(&n) {
        return None;
    }
    let h = if n.is_power_of_two() {
        sylvester(n)
    } else if is_prime((n - 1) as u32) && (n - 1) % 4 == 3 {
        paley_one((n - 1) as u32)
    } else {
        let q = n / 2 - 1;
        if !is_prime(q as u32) || q % 4 != 1 {
            return None;
        }
        paley_two(q as u32)
    };
    Some(normalize(h))
}

/// Sylvester recursion: H_{2n} = [[H_n, H_n], [H_n, -H_n]].
fn sylvester(n: usize) -> Array2<i8> {
    let mut h = Array2::from_elem((n, n), 1i8);

    let mut size = 1;
    while size < n {
        // h[0..size, 0..size] holds H_size; fill the other three quadrants.
        for i in 0..size {
            for j in 0..size {
                let v = h[[i, j]];
                h[[i, j + size]] = v;
                h[[i + size, j]] = v;
                h[[i + size, j + size]] = -v;
            }
        }
        size *= 2;
    }

    h
}

/// Quadratic character χ(a) over GF(p): 0, +1 for residues, -1 otherwise.
fn legendre(a: u32, p: u32) -> i8 {
    let a = a % p;
    if a == 0 {
        return 0;
    }
    // Euler's criterion: a^((p-1)/2) ≡ (a/p) (mod p)
    if mod_pow(u64::from(a), u64::from((p - 1) / 2), u64::from(p)) == 1 {
        1
    } else {
        -1
    }
}

/// Paley type I for p ≡ 3 (mod 4): order p + 1.
fn paley_one(p: u32) -> Array2<i8> {
    let n = (p + 1) as usize;
    let mut h = Array2::from_elem((n, n), 1i8);

    for i in 1..n {
        h[[i, 0]] = -1;
    }

    // Interior is Q + I with Q[i, j] = χ(j - i)
    for i in 1..n {
        for j in 1..n {
            let (fi, fj) = ((i - 1) as u32, (j - 1) as u32);
            h[[i, j]] = if fi == fj {
                1
            } else {
                legendre(fj + p - fi, p)
            };
        }
    }

    h
}

/// Paley type II for q ≡ 1 (mod 4): order 2(q + 1).
///
/// Builds the symmetric conference matrix C = [[0, 1ᵀ], [1, Q]] and replaces
/// each zero with [[1, -1], [-1, -1]] and each ±1 with ±[[1, 1], [1, -1]].
fn paley_two(q: u32) -> Array2<i8> {
    let m = (q + 1) as usize;
    let mut c = Array2::zeros((m, m));
    for i in 1..m {
        c[[0, i]] = 1i8;
        c[[i, 0]] = 1i8;
    }
    for i in 1..m {
        for j in 1..m {
            let (fi, fj) = ((i - 1) as u32, (j - 1) as u32);
            c[[i, j]] = legendre(fj + q - fi, q);
        }
    }

    const ZERO_BLOCK: [[i8; 2]; 2] = [[1, -1], [-1, -1]];
    const SIGN_BLOCK: [[i8; 2]; 2] = [[1, 1], [1, -1]];

    let mut h = Array2::zeros((2 * m, 2 * m));
    for i in 0..m {
        for j in 0..m {
            for (a, b) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                h[[2 * i + a, 2 * j + b]] = match c[[i, j]] {
                    0 => ZERO_BLOCK[a][b],
                    s => s * SIGN_BLOCK[a][b],
                };
            }
        }
    }
    h
}

/// Negate rows, then columns, until the first column and first row are all +1.
fn normalize(mut h: Array2<i8>) -> Array2<i8> {
    let n = h.nrows();
    for i in 0..n {
        if h[[i, 0]] == -1 {
            h.row_mut(i).mapv_inplace(|v| -v);
        }
    }
    for j in 0..n {
        if h[[0, j]] == -1 {
            h.column_mut(j).mapv_inplace(|v| -v);
        }
    }
    h
}
