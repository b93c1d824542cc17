// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use caim::binning::{moving_window_subtraction, windowed_mean, windowed_variance};
use caim::error::ErrorKind;
use ndarray::{Array1, array};
use rstest::rstest;

use crate::test_helpers::{assert_abs_diff_eq, gaussian_series};

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(5)]
fn constant_series_is_preserved(#[case] window: usize) {
    let series = array![1.0, 1.0, 1.0, 1.0, 1.0];
    let mean = windowed_mean(series.view(), window).unwrap();
    for v in mean.iter() {
        assert_abs_diff_eq!(*v, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn edges_replicate_first_and_last_sample() {
    let mean = windowed_mean(array![1.0, 2.0, 3.0, 4.0, 5.0].view(), 3).unwrap();
    // (1 + 1 + 2) / 3 at the left edge, (4 + 5 + 5) / 3 at the right
    let expected = array![4.0 / 3.0, 2.0, 3.0, 4.0, 14.0 / 3.0];
    for (got, want) in mean.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(*got, *want, epsilon = 1e-12);
    }
}

#[test]
fn even_window_is_widened() {
    let series = gaussian_series(40, 0.0, 1.0, 11);
    let even = windowed_mean(series.view(), 4).unwrap();
    let odd = windowed_mean(series.view(), 5).unwrap();
    assert_eq!(even, odd);
}

#[test]
fn running_sum_matches_direct_average() {
    let series = gaussian_series(60, 2.0, 0.5, 5);
    let w = 7;
    let mean = windowed_mean(series.view(), w).unwrap();
    let n = series.len() as isize;
    for i in 0..series.len() as isize {
        let direct: f64 = (i - 3..=i + 3)
            .map(|j| series[j.clamp(0, n - 1) as usize])
            .sum::<f64>()
            / w as f64;
        assert_abs_diff_eq!(mean[i as usize], direct, epsilon = 1e-10);
    }
}

#[test]
fn zero_window_is_range_error() {
    let err = windowed_mean(array![1.0, 2.0].view(), 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn window_longer_than_series_is_range_error() {
    let err = windowed_mean(array![1.0, 2.0, 3.0].view(), 5).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn empty_series_is_invalid_input() {
    let err = windowed_mean(Array1::<f64>::zeros(0).view(), 3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn variance_is_non_negative_and_zero_for_constants() {
    let constant = Array1::from_elem(30, 0.7);
    let var = windowed_variance(constant.view(), 5).unwrap();
    for v in var.iter() {
        assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-12);
    }

    let noisy = gaussian_series(100, 0.0, 1.0, 9);
    let var = windowed_variance(noisy.view(), 9).unwrap();
    assert!(var.iter().all(|&v| v >= 0.0));
    assert!(var.iter().any(|&v| v > 0.0));
}

#[test]
fn subtraction_is_shifted_to_zero_minimum() {
    let series = gaussian_series(100, 5.0, 2.0, 13);
    let detrended = moving_window_subtraction(series.view(), 5).unwrap();
    let min = detrended.iter().copied().fold(f64::INFINITY, f64::min);
    assert_eq!(min, 0.0);
    assert_eq!(detrended.len(), series.len());
}
