// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, ArrayView1};

use crate::binning::moving_window::moving_window_subtraction;
use crate::config::AnalysisConfig;
use crate::error::{CaimError, Result};

/// Reject empty series and series with NaN or infinite samples.
pub fn validate_series(series: ArrayView1<'_, f64>) -> Result<()> {
    if series.is_empty() {
        return Err(CaimError::invalid("time series has length 0"));
    }
    if let Some(i) = series.iter().position(|v| !v.is_finite()) {
        return Err(CaimError::invalid(format!(
            "time series has a non-finite value at position {i}"
        )));
    }
    Ok(())
}

/// Arithmetic mean and population standard deviation (two-pass).
pub fn mean_and_stdev(series: ArrayView1<'_, f64>) -> (f64, f64) {
    let n = series.len() as f64;
    let mean = series.sum() / n;
    let var = series.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Map values `>= threshold` to 1 and everything else to 0.
pub fn bin_threshold(series: ArrayView1<'_, f64>, threshold: f64) -> Result<Array1<u8>> {
    if threshold.is_nan() {
        return Err(CaimError::range("threshold is NaN"));
    }
    Ok(series.mapv(|v| u8::from(v >= threshold)))
}

/// Threshold at the arithmetic mean of the whole series.
pub fn bin_mean_threshold(series: ArrayView1<'_, f64>) -> Result<Array1<u8>> {
    validate_series(series)?;
    let (mean, _) = mean_and_stdev(series);
    bin_threshold(series, mean)
}

/// Flag global outliers: 1 where `|v - mean| >= stdev`, else 0.
pub fn bin_extremes(series: ArrayView1<'_, f64>) -> Result<Array1<u8>> {
    validate_series(series)?;
    let (mean, stdev) = mean_and_stdev(series);
    Ok(series.mapv(|v| u8::from((v - mean).abs() >= stdev)))
}

/// Detrend with a centered moving average, then apply [`bin_extremes`].
///
/// The window is `floor(N / 20)`, widened to the next odd size. A window of one means no
/// smoothing: the "moving average" is the series itself, the detrended series is all zeros
/// and every sample bins to 1. Windows longer than 10% of the series are rejected.
pub fn bin_moving_extremes(series: ArrayView1<'_, f64>) -> Result<Array1<u8>> {
    bin_moving_extremes_with(series, &AnalysisConfig::default())
}

/// [`bin_moving_extremes`] with the window divisor and size limit taken from `config`.
pub fn bin_moving_extremes_with(
    series: ArrayView1<'_, f64>,
    config: &AnalysisConfig,
) -> Result<Array1<u8>> {
    validate_series(series)?;
    let n = series.len();

    let mut window = n / config.moving_window_divisor.max(1);
    if window % 2 == 0 {
        window += 1;
    }
    if window > 1 && window as f64 > config.max_window_fraction * n as f64 {
        let pct = (10000.0 * window as f64 / n as f64).round() / 100.0;
        return Err(CaimError::range(format!(
            "window size is too large, got {window} ({pct}% of time series length)"
        )));
    }

    let detrended = moving_window_subtraction(series, window)?;
    bin_extremes(detrended.view())
}
