// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analysis configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CaimError, Result};
use crate::estimators::significance::DEFAULT_PERMUTATIONS;

/// Largest history length whose joint (target history, source history, next) code
/// still fits into a `u64`.
pub const MAX_SUPPORTED_HISTORY: usize = 31;

/// Parameters shared by the curve builder and the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of surrogates drawn per permutation test.
    pub permutations: usize,

    /// Upper bound on history length; the effective bound is `min(max_history, N - 1)`.
    pub max_history: usize,

    /// Active-information history lengths strictly below this value get a p-value.
    pub ai_significance_below: usize,

    /// Transfer-entropy history lengths strictly below this value get a p-value.
    pub te_significance_below: usize,

    /// Cross-correlation lags with `|lag| <= mi_significance_max_lag` get a p-value.
    pub mi_significance_max_lag: usize,

    /// Moving-extremes window size is `floor(N / moving_window_divisor)`.
    pub moving_window_divisor: usize,

    /// Largest window the moving-extremes binner accepts, as a fraction of N.
    pub max_window_fraction: f64,

    /// History length shown in the AI / TE summary cells.
    pub reported_history: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            permutations: DEFAULT_PERMUTATIONS,
            max_history: 16,
            ai_significance_below: 6,
            te_significance_below: 3,
            mi_significance_max_lag: 0,
            moving_window_divisor: 20,
            max_window_fraction: 0.1,
            reported_history: 2,
        }
    }
}

impl AnalysisConfig {
    /// Parse a (possibly partial) JSON configuration; missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CAIM_*` environment overrides on top of `self`.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(v) = env_usize("CAIM_PERMUTATIONS")? {
            self.permutations = v;
        }
        if let Some(v) = env_usize("CAIM_MAX_HISTORY")? {
            self.max_history = v;
        }
        if let Some(v) = env_usize("CAIM_AI_SIGNIFICANCE_BELOW")? {
            self.ai_significance_below = v;
        }
        if let Some(v) = env_usize("CAIM_TE_SIGNIFICANCE_BELOW")? {
            self.te_significance_below = v;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.permutations == 0 {
            return Err(CaimError::Config("permutations must be > 0".into()));
        }
        if self.max_history == 0 || self.max_history > MAX_SUPPORTED_HISTORY {
            return Err(CaimError::Config(format!(
                "max_history must be in [1, {MAX_SUPPORTED_HISTORY}], got {}",
                self.max_history
            )));
        }
        if self.moving_window_divisor == 0 {
            return Err(CaimError::Config("moving_window_divisor must be > 0".into()));
        }
        if !(self.max_window_fraction > 0.0 && self.max_window_fraction <= 1.0) {
            return Err(CaimError::Config(format!(
                "max_window_fraction must be in (0, 1], got {}",
                self.max_window_fraction
            )));
        }
        Ok(())
    }

    /// Effective maximum history length for a series of `n` samples.
    pub fn history_bound(&self, n: usize) -> usize {
        self.max_history.min(n.saturating_sub(1))
    }
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|e| CaimError::Config(format!("{key}: {e}"))),
        _ => Ok(None),
    }
}
