//! Seqsig - Exact significance of ordered symbol patterns in sequence data
//!
//! This library scores user-supplied patterns (ordered lists of distinct
//! symbols) against a dataset of symbol sequences. For every pattern it counts
//! the sequences containing the pattern as a subsequence and compares that
//! support against the probability of the pattern occurring by chance when
//! each sequence is a uniformly random ordering of its own tokens.
//!
//! Occurrence probabilities are computed exactly, using prime-exponent
//! arithmetic for the combinatorial weights, and combined into exact
//! (Poisson-binomial), normal and Poisson p-values. A Westfall-Young
//! resampling harness calibrates a family-wise threshold across patterns.
//!
//! # Example
//!
//! ```
//! use seqsig::{Analyzer, Dataset, Pattern};
//!
//! let mut data = Dataset::from_reader("A B\nB A\nA B\n".as_bytes()).unwrap();
//! let pattern: Pattern = "A B".parse().unwrap();
//! let mut analyzer = Analyzer::new([pattern]);
//! analyzer.process(&mut data);
//!
//! let report = &analyzer.reports()[0];
//! assert_eq!(report.support, 2);
//! assert_eq!(report.expected_value, 1.5);
//! ```

pub mod analysis;
pub mod cli;
pub mod combinatorics;
pub mod config;
pub mod dataset;
pub mod error;
pub mod exact;
pub mod output;
pub mod pattern;
pub mod significance;
pub mod tracker;
pub mod westfall_young;

pub use analysis::{Analyzer, PatternReport};
pub use config::{AnalysisConfig, RankPolicy};
pub use dataset::{Dataset, DatasetShape, TokenSource};
pub use error::{Result, SigError};
pub use pattern::Pattern;
pub use tracker::PatternTracker;
