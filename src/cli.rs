//! CLI argument parsing for seqsig

use crate::output::Column;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for pattern scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Space-separated scores followed by the pattern (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "seqsig")]
#[command(version)]
#[command(about = "Exact significance of ordered symbol patterns in sequence data", long_about = None)]
pub struct Cli {
    /// Data file: one sequence per line, whitespace-separated tokens
    pub data: PathBuf,

    /// Pattern file: one pattern per line
    pub patterns: PathBuf,

    /// Write results to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Verbose (-v) or extra verbose (-vv) diagnostics on stderr
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Output support
    #[arg(short = 's')]
    pub support: bool,

    /// Output expected value
    #[arg(short = 'e')]
    pub expected: bool,

    /// Output standard deviation
    #[arg(short = 'd')]
    pub deviation: bool,

    /// Output number of sequences with non-zero probability
    #[arg(short = 'c')]
    pub non_zero: bool,

    /// Output p-value (normal approximation)
    #[arg(short = 'n')]
    pub p_normal: bool,

    /// Output -log(p-value) (normal approximation)
    #[arg(short = 'N')]
    pub neg_log_normal: bool,

    /// Output p-value (exact)
    #[arg(short = 'p')]
    pub p_exact: bool,

    /// Output -log(p-value) (exact)
    #[arg(short = 'P')]
    pub neg_log_exact: bool,

    /// Output p-value (Poisson approximation)
    #[arg(short = 'l')]
    pub p_poisson: bool,

    /// Output -log(p-value) (Poisson approximation)
    #[arg(short = 'L')]
    pub neg_log_poisson: bool,

    /// Output p-value (length-based estimator)
    #[cfg(feature = "sigspan")]
    #[arg(short = 'i')]
    pub p_span: bool,

    /// Output -log(p-value) (length-based estimator)
    #[cfg(feature = "sigspan")]
    #[arg(short = 'I')]
    pub neg_log_span: bool,

    /// Calibrate a Westfall-Young family-wise threshold at this alpha
    #[arg(short = 'W', long = "westfall-young", value_name = "ALPHA")]
    pub westfall_young: Option<f64>,

    /// Report the Bonferroni threshold at this alpha
    #[arg(short = 'B', long = "bonferroni", value_name = "ALPHA")]
    pub bonferroni: Option<f64>,

    /// Number of shuffled passes for Westfall-Young
    #[arg(long = "trials", value_name = "N")]
    pub trials: Option<usize>,

    /// Base seed for the within-sequence shuffles
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Pick the threshold rank as ceil(alpha * trials) instead of the fixed 5th smallest
    #[arg(long = "rank-from-alpha")]
    pub rank_from_alpha: bool,

    /// TOML file with calibration settings
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl Cli {
    /// Tracing verbosity: 0 quiet, 1 debug, 2 trace
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(2)
    }

    /// Selected score columns in canonical order
    pub fn columns(&self) -> Vec<Column> {
        let mut selected = vec![
            (self.support, Column::Support),
            (self.expected, Column::ExpectedValue),
            (self.deviation, Column::StandardDeviation),
            (self.non_zero, Column::NonZeroSequences),
            (self.p_normal, Column::PNormal),
            (self.neg_log_normal, Column::NegLogPNormal),
            (self.p_exact, Column::PExact),
            (self.neg_log_exact, Column::NegLogPExact),
            (self.p_poisson, Column::PPoisson),
            (self.neg_log_poisson, Column::NegLogPPoisson),
        ];
        #[cfg(feature = "sigspan")]
        selected.extend([
            (self.p_span, Column::PSpan),
            (self.neg_log_span, Column::NegLogPSpan),
        ]);
        selected.retain(|(on, _)| *on);
        selected.into_iter().map(|(_, column)| column).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_positional_files() {
        let cli = Cli::parse_from(["seqsig", "data.txt", "patterns.txt"]);
        assert_eq!(cli.data, PathBuf::from("data.txt"));
        assert_eq!(cli.patterns, PathBuf::from("patterns.txt"));
        assert!(cli.columns().is_empty());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_requires_files() {
        assert!(Cli::try_parse_from(["seqsig", "data.txt"]).is_err());
    }

    #[test]
    fn test_cli_columns_canonical_order() {
        let cli = Cli::parse_from(["seqsig", "-P", "-s", "-e", "d", "p"]);
        assert_eq!(
            cli.columns(),
            vec![Column::Support, Column::ExpectedValue, Column::NegLogPExact]
        );
    }

    #[test]
    fn test_cli_combined_short_flags() {
        let cli = Cli::parse_from(["seqsig", "-secp", "d", "p"]);
        assert_eq!(
            cli.columns(),
            vec![
                Column::Support,
                Column::ExpectedValue,
                Column::NonZeroSequences,
                Column::PExact
            ]
        );
    }

    #[test]
    fn test_cli_verbosity() {
        assert_eq!(Cli::parse_from(["seqsig", "d", "p"]).verbosity(), 0);
        assert_eq!(Cli::parse_from(["seqsig", "-v", "d", "p"]).verbosity(), 1);
        assert_eq!(Cli::parse_from(["seqsig", "-vv", "d", "p"]).verbosity(), 2);
        assert_eq!(Cli::parse_from(["seqsig", "-vvv", "d", "p"]).verbosity(), 2);
    }

    #[test]
    fn test_cli_calibration_options() {
        let cli = Cli::parse_from([
            "seqsig",
            "-W",
            "0.05",
            "--seed",
            "7",
            "--trials",
            "50",
            "--rank-from-alpha",
            "d",
            "p",
        ]);
        assert_eq!(cli.westfall_young, Some(0.05));
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.trials, Some(50));
        assert!(cli.rank_from_alpha);
    }

    #[test]
    fn test_cli_output_and_format() {
        let cli = Cli::parse_from(["seqsig", "-o", "out.txt", "--format", "json", "d", "p"]);
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
