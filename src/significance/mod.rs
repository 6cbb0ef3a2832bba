// Significance estimators over a finished pattern tracker
//
// Under the null hypothesis every sequence is an independent Bernoulli trial
// whose success probability is the exact occurrence probability of the
// pattern given that sequence's token counts. Support is then
// Poisson-binomial distributed. Three upper-tail estimators are provided:
//
// - exact: full Poisson-binomial convolution
// - normal: continuity-corrected Gaussian approximation
// - Poisson: Poisson approximation, reflected when the requested tail is the
//   larger half
//
// The length-based estimator (feature `sigspan`) ignores the per-sequence
// counts and models each sequence as i.i.d. draws from the global symbol
// frequencies.

#[cfg(feature = "sigspan")]
mod span;

#[cfg(feature = "sigspan")]
pub use span::span_fit_probabilities;

use crate::error::{Result, SigError};
use crate::tracker::PatternTracker;

/// Upper tail `P(S >= support)` of the Poisson-binomial distribution
///
/// `probabilities` are the independent Bernoulli parameters; `None` when the
/// list is empty.
pub fn poisson_binomial_upper_tail(probabilities: &[f64], support: u64) -> Option<f64> {
    if probabilities.is_empty() {
        return None;
    }

    let n = probabilities.len();
    let mut q = vec![0.0f64; n + 1];
    q[0] = 1.0;
    for &p in probabilities {
        // descending so each p contributes exactly once per position
        for i in (1..=n).rev() {
            q[i] = q[i] * (1.0 - p) + q[i - 1] * p;
        }
        q[0] *= 1.0 - p;
    }

    let start = usize::try_from(support).unwrap_or(usize::MAX);
    Some(q.iter().skip(start).sum())
}

/// Continuity-corrected Gaussian upper tail
pub fn normal_upper_tail(support: u64, expected: f64, standard_deviation: f64) -> f64 {
    let z = (support as f64 - 0.5 - expected) / standard_deviation;
    libm::erfc(z / std::f64::consts::SQRT_2) / 2.0
}

/// Poisson approximation of the upper tail `P(S >= support)`
///
/// `max_value` is the effective population size (sequences with non-zero
/// probability). When `support` lies in the upper half the computation is
/// reflected around `max_value` so the partial exponential series stays short.
pub fn poisson_upper_tail(support: u64, lambda: f64, max_value: u64) -> Option<f64> {
    if max_value == 0 {
        return None;
    }

    let mut val = support;
    let mut lambda = lambda;
    let mut reflected = false;
    if max_value.saturating_sub(val) < val {
        val = max_value - val;
        lambda = max_value as f64 - lambda;
        reflected = true;
    }

    // partial series sum_{i=1}^{val-1} lambda^i / i!
    let mut series = 0.0f64;
    let mut term = 1.0f64;
    for i in 1..val {
        term *= lambda / i as f64;
        series += term;
    }

    let lower = (-lambda).exp() * (1.0 + series);
    Some(if reflected { lower } else { 1.0 - lower })
}

/// Negative natural log of a p-value, as printed by the `-P`/`-N`/`-L` flags
pub fn neg_log(p: f64) -> f64 {
    -p.ln()
}

impl PatternTracker {
    fn degenerate(&self) -> SigError {
        SigError::DegenerateDistribution {
            pattern: self.pattern().to_string(),
        }
    }

    /// Exact Poisson-binomial p-value of the observed support
    pub fn p_value_exact(&self) -> Result<f64> {
        self.p_value_exact_at(self.support())
    }

    /// Exact p-value for an arbitrary support against this tracker's
    /// probability list
    pub fn p_value_exact_at(&self, support: u64) -> Result<f64> {
        poisson_binomial_upper_tail(self.probabilities(), support).ok_or_else(|| self.degenerate())
    }

    /// Normal-approximation p-value
    pub fn p_value_normal(&self) -> f64 {
        normal_upper_tail(self.support(), self.expected_value(), self.standard_deviation())
    }

    /// Poisson-approximation p-value
    pub fn p_value_poisson(&self) -> Result<f64> {
        poisson_upper_tail(
            self.support(),
            self.expected_value(),
            self.non_zero_sequences() as u64,
        )
        .ok_or_else(|| self.degenerate())
    }
}
