//! Utility functions for combinatorics, small-number arithmetic and robust statistics.
//!
//! The combination generators here are shared by the fractional-factorial
//! alias assignment and the contrast-matrix interaction enumeration, so both
//! walk interactions in exactly the same order.

/// Compute binomial coefficient C(n, k) = n! / (k! * (n-k)!)
///
/// Returns `None` if the result would overflow `u64`.
///
/// # Examples
///
/// ```
/// use doe::utils::binomial;
///
/// assert_eq!(binomial(5, 2), Some(10));
/// assert_eq!(binomial(10, 5), Some(252));
/// assert_eq!(binomial(5, 0), Some(1));
/// assert_eq!(binomial(3, 5), Some(0)); // k > n
/// ```
#[must_use]
pub fn binomial(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }

    // Use symmetry: C(n, k) = C(n, n-k)
    let k = k.min(n - k);

    if k == 0 {
        return Some(1);
    }

    let mut result: u64 = 1;
    for i in 0..k {
        // Exact at every step: result holds C(n, i) * (n - i) before the division.
        result = result.checked_mul(n - i)?;
        result /= i + 1;
    }

    Some(result)
}

/// Compute `base^exp mod modulus` using binary exponentiation.
///
/// # Panics
///
/// Panics if `modulus` is 0.
///
/// # Examples
///
/// ```
/// use doe::utils::mod_pow;
///
/// assert_eq!(mod_pow(2, 10, 1000), 24);
/// assert_eq!(mod_pow(3, 5, 7), 5);
/// ```
#[must_use]
pub fn mod_pow(mut base: u64, mut exp: u64, modulus: u64) -> u64 {
    assert!(modulus > 0, "modulus must be positive");

    if modulus == 1 {
        return 0;
    }

    let mut result = 1u64;
    base %= modulus;

    while exp > 0 {
        if exp & 1 == 1 {
            result = result.wrapping_mul(base) % modulus;
        }
        exp >>= 1;
        base = base.wrapping_mul(base) % modulus;
    }

    result
}

/// Test whether `n` is prime by trial division.
///
/// Only used for the small orders that appear in Hadamard tables.
///
/// ```
/// use doe::utils::is_prime;
///
/// assert!(is_prime(11));
/// assert!(is_prime(23));
/// assert!(!is_prime(21));
/// assert!(!is_prime(1));
/// ```
#[must_use]
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Median of a slice of floats, or `None` if the slice is empty.
///
/// Even-length inputs average the two middle values.
///
/// ```
/// use doe::utils::median;
///
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// assert_eq!(median(&[]), None);
/// ```
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Generate all k-combinations of indices 0..n in lexicographic order.
///
/// # Examples
///
/// ```
/// use doe::utils::combinations;
///
/// let combos: Vec<Vec<usize>> = combinations(4, 2).collect();
/// assert_eq!(combos.len(), 6); // C(4,2) = 6
/// assert_eq!(combos[0], vec![0, 1]);
/// assert_eq!(combos[5], vec![2, 3]);
/// ```
pub fn combinations(n: usize, k: usize) -> impl Iterator<Item = Vec<usize>> {
    CombinationIterator::new(n, k)
}

/// Generate combinations of 0..n of increasing size, starting at `from`.
///
/// All subsets of size `from` come first (lexicographically), then all of
/// size `from + 1`, and so on up to `n`. The iterator is lazy, so callers
/// can stop as soon as they have enough columns.
///
/// ```
/// use doe::utils::combinations_by_size;
///
/// let combos: Vec<Vec<usize>> = combinations_by_size(3, 2).collect();
/// assert_eq!(combos, vec![vec![0, 1], vec![0, 2], vec![1, 2], vec![0, 1, 2]]);
/// ```
pub fn combinations_by_size(n: usize, from: usize) -> impl Iterator<Item = Vec<usize>> {
    (from.max(1)..=n).flat_map(move |k| combinations(n, k))
}

/// Iterator over k-combinations of 0..n.
struct CombinationIterator {
    n: usize,
    k: usize,
    indices: Vec<usize>,
    finished: bool,
}

impl CombinationIterator {
    fn new(n: usize, k: usize) -> Self {
        if k > n || k == 0 {
            return Self {
                n,
                k,
                indices: Vec::new(),
                finished: k > n,
            };
        }

        Self {
            n,
            k,
            indices: (0..k).collect(),
            finished: false,
        }
    }
}

impl Iterator for CombinationIterator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if self.k == 0 {
            self.finished = true;
            return Some(Vec::new());
        }

        let result = self.indices.clone();

        // Find rightmost index that can be incremented
        let mut i = self.k;
        while i > 0 {
            i -= 1;
            if self.indices[i] < self.n - self.k + i {
                self.indices[i] += 1;
                for j in (i + 1)..self.k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                return Some(result);
            }
        }

        self.finished = true;
        Some(result)
    }
}

/// Spreadsheet-style letter for a factor position: A..Z, then AA, AB, ...
///
/// Used when rendering generators such as `D = A*B*C`.
#[must_use]
pub fn factor_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'A' + (index % 26) as u8));
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(0, 0), Some(1));
        assert_eq!(binomial(5, 5), Some(1));
        assert_eq!(binomial(5, 2), Some(10));
        assert_eq!(binomial(10, 3), Some(120));
        assert_eq!(binomial(20, 10), Some(184_756));
    }

    #[test]
    fn test_mod_pow() {
        assert_eq!(mod_pow(2, 0, 7), 1);
        assert_eq!(mod_pow(0, 5, 7), 0);
        assert_eq!(mod_pow(7, 3, 11), 2);
    }

    #[test]
    fn test_is_prime() {
        let primes: Vec<u32> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[5.0]), Some(5.0));
        assert_eq!(median(&[1.0, -1.0]), Some(0.0));
        assert_eq!(median(&[9.0, 1.0, 5.0, 3.0, 7.0]), Some(5.0));
    }

    #[test]
    fn test_combinations() {
        let c: Vec<_> = combinations(4, 2).collect();
        assert_eq!(
            c,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );

        assert_eq!(combinations(5, 3).count(), 10);
        assert_eq!(combinations(3, 4).count(), 0);

        let c: Vec<_> = combinations(3, 0).collect();
        assert_eq!(c, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_combinations_by_size() {
        // 2^4 - 4 - 1 interactions of four factors
        assert_eq!(combinations_by_size(4, 2).count(), 11);

        let sizes: Vec<usize> = combinations_by_size(4, 1).map(|c| c.len()).collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(sizes.len(), 15);

        assert_eq!(combinations_by_size(1, 2).count(), 0);
    }

    #[test]
    fn test_factor_letter() {
        assert_eq!(factor_letter(0), "A");
        assert_eq!(factor_letter(25), "Z");
        assert_eq!(factor_letter(26), "AA");
        assert_eq!(factor_letter(27), "AB");
    }
}
