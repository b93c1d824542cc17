// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, ArrayView1};

use crate::binning::binners::validate_series;
use crate::error::{CaimError, Result};

/// Centered moving average with edge replication.
///
/// An even `window` is widened by one so the window stays centered. A window of one
/// returns a copy of the input. Near the two ends the window is filled by repeating the
/// first (resp. last) sample, so the divisor is always the nominal window size and a
/// constant series maps to itself.
///
/// The running total is updated in O(1) per sample: the entering sample is added and the
/// leaving sample subtracted, both scaled by `1 / window`.
///
/// # Errors
/// * `InvalidInput` if the series is empty or contains non-finite values.
/// * `Range` if `window` is zero or (after widening) longer than the series.
pub fn windowed_mean(series: ArrayView1<'_, f64>, window: usize) -> Result<Array1<f64>> {
    validate_series(series)?;
    if window == 0 {
        return Err(CaimError::range("window size must be positive"));
    }

    let w = if window % 2 == 0 { window + 1 } else { window };
    if w == 1 {
        return Ok(series.to_owned());
    }

    let n = series.len();
    if w > n {
        return Err(CaimError::range(format!(
            "window size {w} exceeds time series length {n}"
        )));
    }

    let end = n - 1;
    let k = 1.0 / w as f64;
    let w2 = w / 2;
    let mut mean = Array1::<f64>::zeros(n);

    mean[0] = k * w2 as f64 * series[0];
    for i in 0..(w - w2) {
        mean[0] += k * series[i];
    }

    // Leading edge: the leaving sample is the replicated first value.
    for i in 1..=w2 {
        mean[i] = mean[i - 1] + k * (series[i + w2] - series[0]);
    }

    for i in (w2 + 1)..(n - w2) {
        mean[i] = mean[i - 1] + k * (series[i + w2] - series[i - w2 - 1]);
    }

    // Trailing edge: the entering sample is the replicated last value.
    for i in (n - w2)..n {
        mean[i] = mean[i - 1] + k * (series[end] - series[i - w2 - 1]);
    }

    if mean.iter().any(|v| !v.is_finite()) {
        return Err(CaimError::invalid("moving average produced a non-finite value"));
    }
    Ok(mean)
}

/// Centered moving (population) variance using the same window and edge convention as
/// [`windowed_mean`]: `E[x^2] - E[x]^2` over each window, clamped at zero.
pub fn windowed_variance(series: ArrayView1<'_, f64>, window: usize) -> Result<Array1<f64>> {
    let mean = windowed_mean(series, window)?;
    let squares = series.mapv(|v| v * v);
    let mean_sq = windowed_mean(squares.view(), window)?;
    Ok(ndarray::Zip::from(&mean_sq)
        .and(&mean)
        .map_collect(|&m2, &m| (m2 - m * m).max(0.0)))
}

/// Subtract the moving average from the series and shift the result so that its minimum
/// is exactly zero.
pub fn moving_window_subtraction(series: ArrayView1<'_, f64>, window: usize) -> Result<Array1<f64>> {
    let mean = windowed_mean(series, window)?;
    let mut detrended = &series - &mean;

    let min = detrended.iter().copied().fold(f64::INFINITY, f64::min);
    detrended.mapv_inplace(|v| v - min);

    if detrended.iter().any(|v| !v.is_finite()) {
        return Err(CaimError::invalid("detrended series has a non-finite value"));
    }
    Ok(detrended)
}
