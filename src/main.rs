use anyhow::{Context, Result};
use clap::Parser;
use seqsig::{
    cli::Cli,
    config::validate_alpha,
    output::RunOutput,
    pattern::PatternReader,
    westfall_young::bonferroni_threshold,
    AnalysisConfig, Analyzer, Dataset, Pattern, RankPolicy,
};
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber on stderr
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Config file first, then CLI overrides
///
/// Calibration settings are only checked when a calibration is requested.
fn load_config(args: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(alpha) = args.westfall_young {
        config.alpha = alpha;
    }
    if let Some(trials) = args.trials {
        config.trials = trials;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.rank_from_alpha {
        config.rank = RankPolicy::FromAlpha;
    }

    if args.westfall_young.is_some() {
        config.validate()?;
    }
    if let Some(alpha) = args.bonferroni {
        validate_alpha(alpha).context("Invalid value for -B")?;
    }
    Ok(config)
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    let file =
        File::open(path).with_context(|| format!("Failed to open data file {}", path.display()))?;
    let dataset = Dataset::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read data file {}", path.display()))?;
    tracing::info!(sequences = dataset.len(), path = %path.display(), "dataset loaded");
    Ok(dataset)
}

fn load_patterns(path: &Path) -> Result<Vec<Pattern>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open pattern file {}", path.display()))?;
    let patterns = PatternReader::new(BufReader::new(file))
        .collect::<seqsig::Result<Vec<_>>>()
        .with_context(|| format!("Invalid pattern in {}", path.display()))?;
    tracing::info!(patterns = patterns.len(), path = %path.display(), "patterns loaded");
    Ok(patterns)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.verbosity());

    let config = load_config(&args)?;
    let mut dataset = load_dataset(&args.data)?;
    let patterns = load_patterns(&args.patterns)?;
    let pattern_count = patterns.len();

    let mut analyzer = Analyzer::new(patterns);
    analyzer.process(&mut dataset);

    let mut output = RunOutput::new(analyzer.shape().clone(), analyzer.reports());

    if args.westfall_young.is_some() {
        let result = analyzer
            .westfall_young(&mut dataset, &config)
            .context("Westfall-Young calibration failed")?;
        output.westfall_young = Some(result);
    }

    if let Some(alpha) = args.bonferroni {
        output.bonferroni = Some(bonferroni_threshold(alpha, pattern_count)?);
    }

    let rendered = output.render(args.format, &args.columns())?;
    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(rendered.as_bytes())?;
            handle.flush()?;
        }
    }

    Ok(())
}
