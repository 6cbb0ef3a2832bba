//! Dataset passes and per-pattern reports
//!
//! The analyzer owns the shared occurrence engine and one tracker per
//! pattern. Every token of a pass is dispatched to every tracker before the
//! stream advances.

use crate::combinatorics::OccurrenceEngine;
use crate::dataset::{DatasetShape, Token, TokenSource};
use crate::pattern::Pattern;
use crate::tracker::{PassMode, PatternTracker};
use serde::Serialize;

/// Per-pattern result row
#[derive(Debug, Clone, Serialize)]
pub struct PatternReport {
    pub pattern: String,
    pub support: u64,
    pub expected_value: f64,
    pub standard_deviation: f64,
    pub non_zero_sequences: usize,
    pub p_normal: f64,
    /// `None` when no sequence had non-zero occurrence probability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_exact: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_poisson: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_span: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_span: Option<f64>,
}

/// Counters for one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub sequences: u64,
    pub tokens: u64,
}

/// Replay `source` once, dispatching every token to every tracker
///
/// The source is rewound first. When `shape` is given, sequence lengths are
/// recorded into it.
pub fn run_pass<S: TokenSource + ?Sized>(
    source: &mut S,
    trackers: &mut [PatternTracker],
    engine: &mut OccurrenceEngine,
    mode: PassMode,
    mut shape: Option<&mut DatasetShape>,
) -> PassSummary {
    source.reset();
    let mut summary = PassSummary::default();
    let mut length = 0usize;

    while let Some(token) = source.next_token() {
        match token {
            Token::Symbol(symbol) => {
                length += 1;
                for tracker in trackers.iter_mut() {
                    tracker.on_token(symbol, mode);
                }
            }
            Token::SequenceEnd => {
                summary.sequences += 1;
                summary.tokens += length as u64;
                if let Some(shape) = shape.as_deref_mut() {
                    shape.record(length);
                }
                length = 0;
                for tracker in trackers.iter_mut() {
                    tracker.on_sequence_end(engine, mode);
                }
            }
        }
    }

    tracing::debug!(
        ?mode,
        sequences = summary.sequences,
        tokens = summary.tokens,
        memo = engine.memo_len(),
        binomials = engine.binomial_len(),
        "pass complete"
    );
    summary
}

/// Owns the trackers and the engine they share
#[derive(Debug, Default)]
pub struct Analyzer {
    engine: OccurrenceEngine,
    trackers: Vec<PatternTracker>,
    shape: DatasetShape,
}

impl Analyzer {
    pub fn new(patterns: impl IntoIterator<Item = Pattern>) -> Self {
        Self {
            engine: OccurrenceEngine::new(),
            trackers: patterns.into_iter().map(PatternTracker::new).collect(),
            shape: DatasetShape::default(),
        }
    }

    /// Full pass: counts, probabilities and the dataset shape
    ///
    /// Every call starts from scratch, so processing the same source twice
    /// yields the same statistics.
    pub fn process<S: TokenSource + ?Sized>(&mut self, source: &mut S) -> PassSummary {
        source.set_shuffle(None);
        for tracker in &mut self.trackers {
            tracker.reset_for_full_pass();
        }
        self.shape.clear();
        run_pass(
            source,
            &mut self.trackers,
            &mut self.engine,
            PassMode::Full,
            Some(&mut self.shape),
        )
    }

    pub fn trackers(&self) -> &[PatternTracker] {
        &self.trackers
    }

    pub fn shape(&self) -> &DatasetShape {
        &self.shape
    }

    /// Split borrow for calibration passes
    pub fn parts_mut(&mut self) -> (&mut [PatternTracker], &mut OccurrenceEngine) {
        (&mut self.trackers, &mut self.engine)
    }

    /// Snapshot of every tracker's statistics
    pub fn reports(&self) -> Vec<PatternReport> {
        self.trackers.iter().map(|t| self.report(t)).collect()
    }

    fn report(&self, tracker: &PatternTracker) -> PatternReport {
        #[cfg(feature = "sigspan")]
        let (expected_span, p_span) = (
            tracker.expected_value_span(&self.shape).ok(),
            tracker.p_value_span(&self.shape).ok(),
        );
        #[cfg(not(feature = "sigspan"))]
        let (expected_span, p_span) = (None, None);

        PatternReport {
            pattern: tracker.pattern().to_string(),
            support: tracker.support(),
            expected_value: tracker.expected_value(),
            standard_deviation: tracker.standard_deviation(),
            non_zero_sequences: tracker.non_zero_sequences(),
            p_normal: tracker.p_value_normal(),
            p_exact: tracker.p_value_exact().ok(),
            p_poisson: tracker.p_value_poisson().ok(),
            expected_span,
            p_span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn dataset(text: &str) -> Dataset {
        Dataset::from_reader(text.as_bytes()).unwrap()
    }

    fn patterns(lines: &[&str]) -> Vec<Pattern> {
        lines.iter().map(|l| l.parse().unwrap()).collect()
    }

    #[test]
    fn test_two_symbol_end_to_end() {
        let mut data = dataset("A B\nB A\nA B\n");
        let mut analyzer = Analyzer::new(patterns(&["A B"]));
        let summary = analyzer.process(&mut data);

        assert_eq!(summary, PassSummary { sequences: 3, tokens: 6 });
        let report = &analyzer.reports()[0];
        assert_eq!(report.support, 2);
        assert_eq!(report.expected_value, 1.5);
        assert_eq!(report.non_zero_sequences, 3);
        assert!(report.p_exact.is_some());
        assert!(report.p_normal.is_finite());
    }

    #[test]
    fn test_every_pattern_sees_every_token() {
        let mut data = dataset("A B C\nC B A\nA C\n");
        let mut analyzer = Analyzer::new(patterns(&["A B", "B C", "A C"]));
        analyzer.process(&mut data);

        let supports: Vec<u64> = analyzer.trackers().iter().map(|t| t.support()).collect();
        assert_eq!(supports, vec![1, 1, 2]);
        assert_eq!(analyzer.shape().sequences(), 3);
        assert_eq!(analyzer.shape().total_tokens(), 8);
    }

    #[test]
    fn test_process_twice_is_idempotent() {
        let mut data = dataset("A B C\nB A\nA C B\n");
        let mut analyzer = Analyzer::new(patterns(&["A B"]));
        analyzer.process(&mut data);
        let first = analyzer.reports()[0].clone();
        let first_lifetime = analyzer.trackers()[0].lifetime_counts().to_vec();
        analyzer.process(&mut data);
        let second = &analyzer.reports()[0];

        assert_eq!(first.support, second.support);
        assert_eq!(first.expected_value, second.expected_value);
        assert_eq!(first.p_exact, second.p_exact);
        assert_eq!(first.expected_span, second.expected_span);
        assert_eq!(first.p_span, second.p_span);
        assert_eq!(first_lifetime, vec![3, 3]);
        assert_eq!(analyzer.trackers()[0].lifetime_counts(), &[3, 3]);
        assert_eq!(analyzer.shape().sequences(), 3);
    }

    #[test]
    fn test_degenerate_pattern_report() {
        let mut data = dataset("A A\nB\n");
        let mut analyzer = Analyzer::new(patterns(&["A B"]));
        analyzer.process(&mut data);
        let report = &analyzer.reports()[0];
        assert_eq!(report.non_zero_sequences, 0);
        assert!(report.p_exact.is_none());
        assert!(report.p_poisson.is_none());
    }

    #[test]
    fn test_count_only_pass_keeps_probabilities() {
        let mut data = dataset("A B\nB A\n");
        let mut analyzer = Analyzer::new(patterns(&["A B"]));
        analyzer.process(&mut data);

        let (trackers, engine) = analyzer.parts_mut();
        for t in trackers.iter_mut() {
            t.reset_support();
        }
        run_pass(&mut data, trackers, engine, PassMode::CountOnly, None);

        let tracker = &analyzer.trackers()[0];
        assert_eq!(tracker.support(), 1);
        assert_eq!(tracker.probabilities(), &[0.5, 0.5]);
    }
}
