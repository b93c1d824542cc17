// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Binarisation of brightness time series.
//!
//! Every binner is a pure function `ArrayView1<f64> -> Array1<u8>`; [`BinnerId`] is the
//! closed set of available strategies and [`bin`] dispatches on it.

pub mod binners;
pub mod moving_window;

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::{CaimError, Result};

pub use binners::{
    bin_extremes, bin_mean_threshold, bin_moving_extremes, bin_moving_extremes_with,
    bin_threshold, validate_series,
};
pub use moving_window::{moving_window_subtraction, windowed_mean, windowed_variance};

/// A continuous per-frame brightness series.
pub type TimeSeries = Array1<f64>;

/// A 0/1 series derived from a [`TimeSeries`].
pub type BinnedSeries = Array1<u8>;

/// Binning strategy identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinnerId {
    /// Extremes after subtracting a centered moving average.
    #[default]
    MovingExtremes,
    /// Extremes relative to the global mean and standard deviation.
    Extremes,
    /// Values at or above the mean.
    MeanThreshold,
}

impl BinnerId {
    pub const ALL: [BinnerId; 3] = [
        BinnerId::MovingExtremes,
        BinnerId::Extremes,
        BinnerId::MeanThreshold,
    ];

    /// Stable identifier used in persisted sessions.
    pub fn as_str(self) -> &'static str {
        match self {
            BinnerId::MovingExtremes => "moving-extremes",
            BinnerId::Extremes => "extremes",
            BinnerId::MeanThreshold => "mean-threshold",
        }
    }

    /// Human readable label for menus.
    pub fn label(self) -> &'static str {
        match self {
            BinnerId::MovingExtremes => "Extremes (Moving Window)",
            BinnerId::Extremes => "Extremes (Global)",
            BinnerId::MeanThreshold => "Mean Threshold",
        }
    }

    /// Bin `series` with this strategy and default parameters.
    pub fn bin(self, series: ArrayView1<'_, f64>) -> Result<BinnedSeries> {
        self.bin_with(series, &AnalysisConfig::default())
    }

    /// Bin `series` with this strategy, taking window parameters from `config`.
    pub fn bin_with(self, series: ArrayView1<'_, f64>, config: &AnalysisConfig) -> Result<BinnedSeries> {
        match self {
            BinnerId::MovingExtremes => bin_moving_extremes_with(series, config),
            BinnerId::Extremes => bin_extremes(series),
            BinnerId::MeanThreshold => bin_mean_threshold(series),
        }
    }
}

impl fmt::Display for BinnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinnerId {
    type Err = CaimError;

    fn from_str(s: &str) -> Result<Self> {
        BinnerId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| CaimError::invalid(format!("unknown binning method '{s}'")))
    }
}

/// Bin `series` using `method`.
pub fn bin(method: BinnerId, series: ArrayView1<'_, f64>) -> Result<BinnedSeries> {
    method.bin(series)
}
