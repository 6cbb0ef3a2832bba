//! Configuration for significance calibration
//!
//! Values come from defaults, an optional TOML file (`--config`) and CLI
//! flags, in increasing precedence.
//!
//! # Example config
//!
//! ```toml
//! alpha = 0.01
//! trials = 1000
//! seed = 17
//!
//! [rank]
//! policy = "from_alpha"
//! ```

use crate::error::SigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which sorted resample minimum becomes the family-wise threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RankPolicy {
    /// Fixed 0-based index into the sorted minima (historical default: 4)
    Fixed { index: usize },
    /// Index `ceil(alpha * trials) - 1`
    FromAlpha,
}

impl RankPolicy {
    /// 0-based index into `trials` sorted minima
    pub fn index(&self, alpha: f64, trials: usize) -> usize {
        let idx = match *self {
            RankPolicy::Fixed { index } => index,
            RankPolicy::FromAlpha => ((alpha * trials as f64).ceil() as usize).saturating_sub(1),
        };
        idx.min(trials.saturating_sub(1))
    }
}

impl Default for RankPolicy {
    fn default() -> Self {
        RankPolicy::Fixed { index: 4 }
    }
}

/// Family-wise significance levels must lie in `(0, 1]`
pub fn validate_alpha(alpha: f64) -> std::result::Result<(), SigError> {
    if alpha > 0.0 && alpha <= 1.0 {
        Ok(())
    } else {
        Err(SigError::InvalidConfig(format!(
            "alpha must be in (0, 1], got {}",
            alpha
        )))
    }
}

/// Westfall-Young calibration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Family-wise significance level
    pub alpha: f64,

    /// Number of shuffled resampling passes
    pub trials: usize,

    /// Threshold rank selection
    pub rank: RankPolicy,

    /// Base seed; each trial derives its own generator from it
    pub seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            trials: 100,
            rank: RankPolicy::default(),
            seed: None,
        }
    }
}

impl AnalysisConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Threshold index for these settings
    pub fn rank_index(&self) -> usize {
        self.rank.index(self.alpha, self.trials)
    }

    pub fn validate(&self) -> std::result::Result<(), SigError> {
        validate_alpha(self.alpha)?;

        if self.trials == 0 {
            return Err(SigError::InvalidConfig(
                "trials must be at least 1".to_string(),
            ));
        }

        if let RankPolicy::Fixed { index } = self.rank {
            if index >= self.trials {
                return Err(SigError::InvalidConfig(format!(
                    "rank index {} out of range for {} trials",
                    index, self.trials
                )));
            }
        }

        Ok(())
    }
}
