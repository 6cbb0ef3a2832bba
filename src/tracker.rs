//! Per-pattern state machine fed token by token, sequence by sequence
//!
//! A tracker is idle between sequences and accumulates per-symbol counts and
//! the leftmost greedy match pointer while a sequence is being consumed. At
//! every sequence boundary it folds the sequence into its running statistics
//! (support, expected value, variance, per-sequence probability list).

use crate::combinatorics::OccurrenceEngine;
use crate::pattern::Pattern;
use fnv::FnvHashMap;

/// How a pass over the dataset updates the trackers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// Count tokens and compute occurrence probabilities
    Full,
    /// Only count support; used by resampling passes
    CountOnly,
}

/// Running statistics for one pattern
#[derive(Debug, Clone)]
pub struct PatternTracker {
    pattern: Pattern,
    index: FnvHashMap<String, usize>,

    // Current sequence
    active: usize,
    counts: Vec<u64>,

    // Lifetime counts across every full pass; survive `reset_for_new_pass`
    lifetime_counts: Vec<u64>,

    support: u64,
    expected_value: f64,
    variance: f64,
    probabilities: Vec<f64>,
}

impl PatternTracker {
    pub fn new(pattern: Pattern) -> Self {
        let index = pattern
            .symbols()
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        let len = pattern.len();

        Self {
            pattern,
            index,
            active: 0,
            counts: vec![0; len],
            lifetime_counts: vec![0; len],
            support: 0,
            expected_value: 0.0,
            variance: 0.0,
            probabilities: Vec::new(),
        }
    }

    /// Handle one token of the current sequence
    ///
    /// Returns false (and does nothing) when `symbol` is not in the pattern.
    /// Only the next needed symbol advances the match pointer.
    pub fn on_token(&mut self, symbol: &str, mode: PassMode) -> bool {
        let Some(&position) = self.index.get(symbol) else {
            return false;
        };

        if self.active == position {
            self.active += 1;
        }
        self.counts[position] += 1;
        if mode == PassMode::Full {
            self.lifetime_counts[position] += 1;
        }
        true
    }

    /// Close the current sequence and fold it into the statistics
    ///
    /// Returns whether the pattern occurred in the sequence.
    pub fn on_sequence_end(&mut self, engine: &mut OccurrenceEngine, mode: PassMode) -> bool {
        let occurred = self.active == self.pattern.len();

        match mode {
            PassMode::CountOnly => {
                self.support += u64::from(occurred);
                tracing::trace!(pattern = %self.pattern, occurred, "sequence counted");
            }
            PassMode::Full => {
                let p = engine.probability(&self.counts);
                let var = p * (1.0 - p);

                self.expected_value += p;
                self.variance += var;
                self.support += u64::from(occurred);
                if p > 0.0 {
                    self.probabilities.push(p);
                }
                tracing::trace!(pattern = %self.pattern, occurred, var, p, "sequence processed");
            }
        }

        self.clear_sequence();
        occurred
    }

    /// Reset everything except lifetime counts before another pass
    pub fn reset_for_new_pass(&mut self) {
        self.clear_sequence();
        self.support = 0;
        self.expected_value = 0.0;
        self.variance = 0.0;
        self.probabilities.clear();
    }

    /// Reset before a fresh full pass over a dataset, lifetime counts included
    pub fn reset_for_full_pass(&mut self) {
        self.reset_for_new_pass();
        self.lifetime_counts.iter_mut().for_each(|c| *c = 0);
    }

    /// Reset only the support counter, keeping the probability list
    ///
    /// Resampling passes replay in count-only mode and compare the new
    /// support against the probabilities of the original pass.
    pub fn reset_support(&mut self) {
        self.clear_sequence();
        self.support = 0;
    }

    fn clear_sequence(&mut self) {
        self.active = 0;
        self.counts.iter_mut().for_each(|c| *c = 0);
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Sequences in which the pattern occurred in order
    pub fn support(&self) -> u64 {
        self.support
    }

    /// Sum of per-sequence occurrence probabilities
    pub fn expected_value(&self) -> f64 {
        self.expected_value
    }

    /// Sum of per-sequence Bernoulli variances
    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn standard_deviation(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Non-zero per-sequence probabilities in processing order
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn non_zero_sequences(&self) -> usize {
        self.probabilities.len()
    }

    /// Lifetime token counts per pattern position
    pub fn lifetime_counts(&self) -> &[u64] {
        &self.lifetime_counts
    }
}
