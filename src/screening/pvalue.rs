//! Empirical p-values against a simulated null distribution.

/// Survival-function estimate of `observed` within ascending `sorted` samples.
///
/// With `idx` the number of samples not exceeding `observed` and `N` the
/// sample count, the p-value is `1 - idx / N`. An observation above every
/// sample gets the smallest resolvable value `1 / N` instead of zero, so the
/// result always lies in `[1/N, 1]`.
///
/// # Example
///
/// ```
/// use doe::screening::empirical_p_value;
///
/// let null = [0.5, 1.0, 1.5, 2.0];
/// assert_eq!(empirical_p_value(&null, 0.1), 1.0);
/// assert_eq!(empirical_p_value(&null, 1.2), 0.5);
/// assert_eq!(empirical_p_value(&null, 9.0), 0.25);
/// ```
#[must_use]
pub fn empirical_p_value(sorted: &[f64], observed: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 1.0;
    }
    let idx = sorted.partition_point(|&s| s <= observed);
    if idx == n {
        1.0 / n as f64
    } else {
        1.0 - idx as f64 / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        let null: Vec<f64> = (1..=100).map(f64::from).collect();
        assert_eq!(empirical_p_value(&null, 0.0), 1.0);
        assert_eq!(empirical_p_value(&null, 100.0), 0.01);
        assert_eq!(empirical_p_value(&null, 1e9), 0.01);
    }

    #[test]
    fn test_ties_count_as_not_exceeding() {
        let null = [1.0, 2.0, 2.0, 2.0, 3.0];
        // Four of five samples do not exceed 2.0
        assert!((empirical_p_value(&null, 2.0) - 0.2).abs() < 1e-12);
        assert!((empirical_p_value(&null, 1.99) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_monotone() {
        let null: Vec<f64> = (0..50).map(|i| f64::from(i) * 0.1).collect();
        let mut last = 1.0;
        for step in 0..60 {
            let p = empirical_p_value(&null, f64::from(step) * 0.1);
            assert!(p <= last);
            assert!((1.0 / 50.0..=1.0).contains(&p));
            last = p;
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(empirical_p_value(&[], 1.0), 1.0);
    }
}
