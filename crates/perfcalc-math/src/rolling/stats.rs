//! Sample statistics over window slices.
//!
//! Every function returns `None` when it cannot produce a value from the
//! observations given; none of them panic on short input.

/// Collects the observations present in a window.
#[must_use]
pub fn present(window: &[Option<f64>]) -> Vec<f64> {
    window.iter().flatten().copied().collect()
}

/// Collects the rows where both observations of a pair are present.
#[must_use]
pub fn present_pairs(window: &[(Option<f64>, Option<f64>)]) -> Vec<(f64, f64)> {
    window
        .iter()
        .filter_map(|&(x, y)| Some((x?, y?)))
        .collect()
}

/// Arithmetic mean. `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (n - 1 denominator). `None` below two observations.
#[must_use]
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Sample standard deviation (n - 1 denominator).
#[must_use]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Sample covariance of paired observations (n - 1 denominator).
#[must_use]
pub fn sample_covariance(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let cross: f64 = pairs
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    Some(cross / (n - 1.0))
}

/// Largest observation. `None` for an empty slice.
#[must_use]
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Compounded growth `Π(1 + r) - 1`. An empty slice compounds to zero.
#[must_use]
pub fn compounded_growth(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_present_skips_missing() {
        assert_eq!(present(&[None, Some(1.0), None, Some(2.0)]), vec![1.0, 2.0]);
        assert_eq!(
            present_pairs(&[(Some(1.0), None), (Some(2.0), Some(3.0))]),
            vec![(2.0, 3.0)]
        );
    }

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values).unwrap(), 5.0);
        // Population variance is 4; sample variance is 32 / 7.
        assert_relative_eq!(sample_variance(&values).unwrap(), 32.0 / 7.0);
        assert_relative_eq!(sample_std(&values).unwrap(), (32.0f64 / 7.0).sqrt());
    }

    #[test]
    fn test_short_inputs() {
        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std(&[1.0]), None);
        assert_eq!(sample_covariance(&[(1.0, 2.0)]), None);
        assert_eq!(max(&[]), None);
        assert_relative_eq!(compounded_growth(&[]), 0.0);
    }

    #[test]
    fn test_covariance_with_self_is_variance() {
        let xs = [0.01, -0.02, 0.03, 0.015, -0.005];
        let pairs: Vec<(f64, f64)> = xs.iter().map(|&x| (x, x)).collect();
        assert_relative_eq!(
            sample_covariance(&pairs).unwrap(),
            sample_variance(&xs).unwrap(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_compounded_growth() {
        assert_relative_eq!(compounded_growth(&[0.1, 0.1]), 0.21, epsilon = 1e-12);
        assert_relative_eq!(compounded_growth(&[0.5, -0.5]), -0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_max() {
        assert_eq!(max(&[1.0, 3.0, 2.0]), Some(3.0));
    }
}
