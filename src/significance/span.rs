// Length-based (SigSpan) estimator
//
// Each sequence of length n is modeled as n i.i.d. draws where symbol k of
// the pattern appears with its lifetime frequency f_k. The probability that
// the pattern fits in a length-n sequence is the probability that the sum of
// the geometric waiting times for symbols 1..m is at most n. Expected support
// is that probability weighted by the dataset's length histogram, and the
// p-value is the Hoeffding bound exp(-2/N * (support - expected)^2).
//
// The fit distribution is built by convolving waiting times; tests check it
// against a direct Markov-chain computation.

use crate::dataset::DatasetShape;
use crate::error::{Result, SigError};
use crate::tracker::PatternTracker;

/// Probability that the pattern fits in a sequence of length `i + 1`
///
/// `frequencies[k]` is the per-token probability of pattern symbol `k`.
/// The returned vector has `max_length` entries and is non-decreasing.
pub fn span_fit_probabilities(frequencies: &[f64], max_length: usize) -> Vec<f64> {
    let Some((&first, rest)) = frequencies.split_first() else {
        return vec![1.0; max_length];
    };

    // prev[i]: first k symbols completed exactly at position i + 1
    let mut prev: Vec<f64> = (0..max_length)
        .map(|i| first * (1.0 - first).powi(i as i32))
        .collect();
    let mut next = vec![0.0f64; max_length];

    for (offset, &f) in rest.iter().enumerate() {
        let k = offset + 2;
        next.fill(0.0);
        for i in k..=max_length {
            for j in (k - 1)..i {
                next[i - 1] += prev[j - 1] * f * (1.0 - f).powi((i - j - 1) as i32);
            }
        }
        std::mem::swap(&mut prev, &mut next);
    }

    for i in 1..prev.len() {
        prev[i] += prev[i - 1];
    }
    prev
}

impl PatternTracker {
    /// Per-symbol lifetime frequencies relative to all tokens in the dataset
    fn span_frequencies(&self, shape: &DatasetShape) -> Result<Vec<f64>> {
        let total = shape.total_tokens();
        if total == 0 {
            return Err(SigError::DegenerateDistribution {
                pattern: self.pattern().to_string(),
            });
        }
        Ok(self
            .lifetime_counts()
            .iter()
            .map(|&c| c as f64 / total as f64)
            .collect())
    }

    /// Expected support under the length-based model
    pub fn expected_value_span(&self, shape: &DatasetShape) -> Result<f64> {
        let frequencies = self.span_frequencies(shape)?;
        let max_length = shape.max_length();
        let fits = span_fit_probabilities(&frequencies, max_length);

        tracing::trace!(
            pattern = %self.pattern(),
            ?frequencies,
            ?fits,
            "length-based fit probabilities"
        );

        Ok(shape
            .iter()
            .filter(|(length, _)| *length >= self.pattern().len() && *length > 0)
            .map(|(length, count)| count as f64 * fits[length - 1])
            .sum())
    }

    /// Hoeffding-style tail bound of the observed support
    pub fn p_value_span(&self, shape: &DatasetShape) -> Result<f64> {
        let expected = self.expected_value_span(shape)?;
        let n = shape.sequences() as f64;
        let diff = self.support() as f64 - expected;
        Ok((-2.0 / n * diff * diff).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinatorics::OccurrenceEngine;
    use crate::tracker::PassMode;

    /// Markov chain over the number of matched symbols
    fn markov_fit(frequencies: &[f64], length: usize) -> f64 {
        let m = frequencies.len();
        let mut state = vec![0.0f64; m + 1];
        state[0] = 1.0;
        for _ in 0..length {
            let mut next = vec![0.0f64; m + 1];
            next[m] = state[m];
            for k in 0..m {
                next[k + 1] += state[k] * frequencies[k];
                next[k] += state[k] * (1.0 - frequencies[k]);
            }
            state = next;
        }
        state[m]
    }

    #[test]
    fn test_single_symbol_geometric() {
        let fits = span_fit_probabilities(&[0.25], 5);
        for (i, fit) in fits.iter().enumerate() {
            let expected = 1.0 - 0.75f64.powi(i as i32 + 1);
            assert!((fit - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_certain_symbols() {
        let fits = span_fit_probabilities(&[1.0, 1.0], 4);
        assert_eq!(fits, vec![0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_convolution_matches_markov_chain() {
        let frequencies = [0.3, 0.1, 0.45];
        let fits = span_fit_probabilities(&frequencies, 12);
        for length in 1..=12 {
            let direct = markov_fit(&frequencies, length);
            assert!(
                (fits[length - 1] - direct).abs() < 1e-12,
                "length {}: {} vs {}",
                length,
                fits[length - 1],
                direct
            );
        }
    }

    #[test]
    fn test_fit_probabilities_non_decreasing() {
        let fits = span_fit_probabilities(&[0.2, 0.2, 0.2, 0.2], 20);
        assert!(fits.windows(2).all(|w| w[0] <= w[1] + 1e-15));
    }

    #[test]
    fn test_expected_value_and_p_value() {
        let mut engine = OccurrenceEngine::new();
        let mut tracker = PatternTracker::new("A B".parse().unwrap());
        let mut shape = DatasetShape::default();
        for seq in ["A B", "B A", "A B"] {
            for token in seq.split_whitespace() {
                tracker.on_token(token, PassMode::Full);
            }
            tracker.on_sequence_end(&mut engine, PassMode::Full);
            shape.record(2);
        }

        // f_A = f_B = 0.5, fit(2) = 0.25, three sequences of length two
        let expected = tracker.expected_value_span(&shape).unwrap();
        assert!((expected - 0.75).abs() < 1e-12);

        let p = tracker.p_value_span(&shape).unwrap();
        let bound = (-2.0 / 3.0 * (2.0f64 - 0.75).powi(2)).exp();
        assert!((p - bound).abs() < 1e-12);
    }

    #[test]
    fn test_empty_dataset_is_degenerate() {
        let tracker = PatternTracker::new("A B".parse().unwrap());
        let shape = DatasetShape::default();
        assert!(matches!(
            tracker.p_value_span(&shape),
            Err(SigError::DegenerateDistribution { .. })
        ));
    }
}
