//! Family-wise significance calibration
//!
//! Testing many patterns at once inflates the chance that some pattern looks
//! significant by accident. The Westfall-Young procedure estimates the
//! distribution of the *smallest* p-value under the null by shuffling tokens
//! within every sequence, recounting support, and re-evaluating each pattern's
//! exact p-value against its original probability list. A low quantile of
//! those minima is the calibrated threshold.
//!
//! Bonferroni (`alpha / patterns`) is offered as the resampling-free bound.
//!
//! # References
//!
//! Westfall, P. H., & Young, S. S. (1993). Resampling-Based Multiple Testing.
//! Wiley.

use crate::analysis::{run_pass, Analyzer};
use crate::combinatorics::OccurrenceEngine;
use crate::config::{validate_alpha, AnalysisConfig};
use crate::dataset::TokenSource;
use crate::error::{Result, SigError};
use crate::significance::neg_log;
use crate::tracker::{PassMode, PatternTracker};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Outcome of a resampling calibration
#[derive(Debug, Clone, Serialize)]
pub struct WestfallYoungResult {
    pub alpha: f64,
    pub trials: usize,
    /// 0-based index into the sorted minima
    pub rank: usize,
    pub threshold: f64,
    pub neg_log_threshold: f64,
    /// Minimum p-value of every trial, in trial order
    pub minima: Vec<f64>,
}

/// Bonferroni-corrected per-pattern threshold
pub fn bonferroni_threshold(alpha: f64, patterns: usize) -> Result<f64> {
    validate_alpha(alpha)?;
    if patterns == 0 {
        return Err(SigError::NoPatterns);
    }
    Ok(alpha / patterns as f64)
}

/// Calibrate a family-wise threshold by within-sequence shuffling
///
/// `trackers` must already hold the probability lists of a full pass over
/// `source`. Each trial reseeds the source's shuffle from an independent seed,
/// replays it in count-only mode and records the smallest exact p-value.
/// Trackers without any non-zero probability cannot produce a p-value and are
/// left out. Supports are restored to the unshuffled values afterwards.
pub fn westfall_young<S: TokenSource + ?Sized>(
    source: &mut S,
    trackers: &mut [PatternTracker],
    engine: &mut OccurrenceEngine,
    config: &AnalysisConfig,
) -> Result<WestfallYoungResult> {
    config.validate()?;

    let usable: Vec<usize> = trackers
        .iter()
        .enumerate()
        .filter(|(_, t)| t.non_zero_sequences() > 0)
        .map(|(i, _)| i)
        .collect();
    if usable.is_empty() {
        return Err(SigError::NoPatterns);
    }
    if usable.len() < trackers.len() {
        tracing::warn!(
            skipped = trackers.len() - usable.len(),
            "patterns without non-zero occurrence probability left out of calibration"
        );
    }

    let base_seed = config.seed.unwrap_or_else(rand::random);
    let mut seeder = StdRng::seed_from_u64(base_seed);
    let mut minima = Vec::with_capacity(config.trials);

    for trial in 0..config.trials {
        source.set_shuffle(Some(seeder.gen()));
        for tracker in trackers.iter_mut() {
            tracker.reset_support();
        }
        run_pass(source, trackers, engine, PassMode::CountOnly, None);

        let mut minimum = f64::INFINITY;
        for &i in &usable {
            minimum = minimum.min(trackers[i].p_value_exact()?);
        }
        tracing::debug!(trial, minimum, "resample complete");
        minima.push(minimum);
    }

    // restore the observed supports
    source.set_shuffle(None);
    for tracker in trackers.iter_mut() {
        tracker.reset_support();
    }
    run_pass(source, trackers, engine, PassMode::CountOnly, None);

    let mut sorted = minima.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = config.rank_index();
    let threshold = sorted[rank];

    tracing::info!(
        base_seed,
        trials = config.trials,
        rank,
        threshold,
        "westfall-young threshold calibrated"
    );

    Ok(WestfallYoungResult {
        alpha: config.alpha,
        trials: config.trials,
        rank,
        threshold,
        neg_log_threshold: neg_log(threshold),
        minima,
    })
}

impl Analyzer {
    /// Westfall-Young calibration over this analyzer's trackers
    pub fn westfall_young<S: TokenSource + ?Sized>(
        &mut self,
        source: &mut S,
        config: &AnalysisConfig,
    ) -> Result<WestfallYoungResult> {
        let (trackers, engine) = self.parts_mut();
        westfall_young(source, trackers, engine, config)
    }
}
