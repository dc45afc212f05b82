//! Reference distributions

/// Standard normal CDF (Abramowitz & Stegun 26.2.17, |error| < 7.5e-8)
pub(crate) fn normal_cdf(x: f64) -> f64 {
    if x < -8.0 {
        return 0.0;
    }
    if x > 8.0 {
        return 1.0;
    }

    let t = 1.0 / (1.0 + 0.2316419 * x.abs());
    let d = 0.3989422804014327; // 1/sqrt(2*pi)
    let p = d
        * (-x * x / 2.0).exp()
        * (t * (0.3193815 + t * (-0.3565638 + t * (1.781478 + t * (-1.821256 + t * 1.330274)))));

    if x > 0.0 { 1.0 - p } else { p }
}

/// Two-tailed p-value of a z-score
pub(crate) fn two_tailed_p(z: f64) -> f64 {
    (2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0)
}

/// P(X <= k) for k = 0..=max_k with X ~ Poisson(lambda)
///
/// The mass is evaluated in log space so large means do not underflow `e^-λ`.
pub(crate) fn poisson_cumulative(lambda: f64, max_k: usize) -> Vec<f64> {
    let ln_lambda = lambda.ln();
    let mut ln_factorial = 0.0;
    let mut total = 0.0;
    let mut out = Vec::with_capacity(max_k + 1);
    for k in 0..=max_k {
        let pmf = if k == 0 {
            (-lambda).exp()
        } else {
            ln_factorial += (k as f64).ln();
            (k as f64 * ln_lambda - lambda - ln_factorial).exp()
        };
        total += pmf;
        out.push(total.min(1.0));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normal_cdf() {
        assert_relative_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-6);
        assert_relative_eq!(normal_cdf(1.96), 0.975, epsilon = 1e-4);
        assert_relative_eq!(normal_cdf(-1.96), 0.025, epsilon = 1e-4);
    }

    #[test]
    fn test_two_tailed_p() {
        assert_relative_eq!(two_tailed_p(1.96), 0.05, epsilon = 1e-3);
        assert_relative_eq!(two_tailed_p(-1.96), 0.05, epsilon = 1e-3);
        assert_relative_eq!(two_tailed_p(0.0), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_poisson_cumulative() {
        let cdf = poisson_cumulative(1.0, 2);
        let e = (-1.0_f64).exp();
        assert_relative_eq!(cdf[0], e);
        assert_relative_eq!(cdf[1], 2.0 * e);
        assert_relative_eq!(cdf[2], 2.5 * e);
    }

    #[test]
    fn test_poisson_cumulative_large_mean() {
        let cdf = poisson_cumulative(800.0, 900);
        assert!(cdf[0] == 0.0);
        // Median of a Poisson sits at about λ
        assert_relative_eq!(cdf[800], 0.5094, epsilon = 1e-3);
        assert!(cdf[900] > 0.999);
    }
}
