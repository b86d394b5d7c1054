/// Probability of exactly `k` events given the rate `lambda`, i.e., `λ^k e^(-λ) / k!`.
///
/// Evaluated as a running product, so that neither `λ^k` nor `k!` is formed explicitly.
#[inline]
pub fn univariate(k: u8, lambda: f64) -> f64 {
    debug_assert!(lambda >= 0.0, "negative rate {lambda}");
    (1..=k).fold(f64::exp(-lambda), |prob, i| prob * lambda / i as f64)
}

/// Natural logarithm of the probability mass function for `k` in `0..log_pmf.len()`, written into
/// `log_pmf`. Remains finite for rates where `e^(-λ)` underflows.
pub fn log_pmf_into(lambda: f64, log_pmf: &mut [f64]) {
    debug_assert!(lambda >= 0.0, "negative rate {lambda}");
    let ln_lambda = lambda.ln();
    let mut log_prob = -lambda;
    for (k, slot) in log_pmf.iter_mut().enumerate() {
        if k > 0 {
            log_prob += ln_lambda - (k as f64).ln();
        }
        *slot = log_prob;
    }
}
