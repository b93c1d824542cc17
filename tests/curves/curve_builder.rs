// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use caim::config::AnalysisConfig;
use caim::curves::{CurveBuilder, CurvePoint, point_at};
use caim::error::ErrorKind;
use caim::estimators::Significance;
use ndarray::{Array1, array};
use rstest::rstest;

use crate::test_helpers::{SeedableRng, StdRng, assert_abs_diff_eq, quick_config, random_binary};

#[rstest]
#[case(1, 0)]
#[case(2, 1)]
#[case(4, 1)]
#[case(8, 2)]
#[case(9, 3)]
#[case(100, 25)]
fn max_lag_is_quarter_length_capped_below_length(#[case] n: usize, #[case] m: usize) {
    assert_eq!(CurveBuilder::max_lag(n), m);
}

#[test]
fn cross_correlation_lags_are_strictly_increasing() {
    let config = quick_config(50);
    let builder = CurveBuilder::new(&config);
    let xs = random_binary(30, 1);
    let ys = random_binary(30, 2);
    let mut rng = StdRng::seed_from_u64(0);
    let curve = builder.cross_correlation(xs.view(), ys.view(), &mut rng).unwrap();

    // M = ceil(30 / 4) = 8
    assert_eq!(curve.len(), 17);
    let lags: Vec<i64> = curve.iter().map(|p| p.x).collect();
    assert_eq!(lags, (-8..=8).collect::<Vec<_>>());
    for p in &curve {
        assert_eq!(p.sig.is_some(), p.x == 0, "lag {}", p.x);
        assert!(p.y >= 0.0);
    }
}

#[test]
fn cross_correlation_peaks_at_the_shift() {
    // ys[t] = xs[t + 1]: positive lag 1 pairs xs[1..] with ys[..N-1]
    let xs = random_binary(64, 17);
    let mut ys = Array1::zeros(64);
    for t in 0..63 {
        ys[t] = xs[t + 1];
    }
    let config = quick_config(20);
    let mut rng = StdRng::seed_from_u64(1);
    let curve = CurveBuilder::new(&config)
        .cross_correlation(xs.view(), ys.view(), &mut rng)
        .unwrap();

    let peak = curve
        .iter()
        .max_by(|a, b| a.y.total_cmp(&b.y))
        .unwrap();
    assert_eq!(peak.x, 1);
    assert!(peak.y > 0.9);
}

#[test]
fn cross_correlation_of_swapped_series_mirrors_lags() {
    let xs = random_binary(40, 3);
    let ys = random_binary(40, 4);
    let config = quick_config(10);
    let builder = CurveBuilder::new(&config);
    let mut rng = StdRng::seed_from_u64(2);
    let forward = builder.cross_correlation(xs.view(), ys.view(), &mut rng).unwrap();
    let backward = builder.cross_correlation(ys.view(), xs.view(), &mut rng).unwrap();
    for p in &forward {
        let q = point_at(&backward, -p.x).unwrap();
        assert_abs_diff_eq!(p.y, q.y, epsilon = 1e-12);
    }
}

#[test]
fn wider_significance_band_covers_more_lags() {
    let config = AnalysisConfig {
        permutations: 20,
        mi_significance_max_lag: 1,
        ..AnalysisConfig::default()
    };
    let xs = random_binary(16, 5);
    let mut rng = StdRng::seed_from_u64(3);
    let curve = CurveBuilder::new(&config)
        .cross_correlation(xs.view(), xs.view(), &mut rng)
        .unwrap();
    let with_sig: Vec<i64> = curve.iter().filter(|p| p.sig.is_some()).map(|p| p.x).collect();
    assert_eq!(with_sig, vec![-1, 0, 1]);
}

#[test]
fn single_sample_gives_single_lag() {
    let xs = array![1u8];
    let config = quick_config(10);
    let mut rng = StdRng::seed_from_u64(4);
    let curve = CurveBuilder::new(&config)
        .cross_correlation(xs.view(), xs.view(), &mut rng)
        .unwrap();
    assert_eq!(curve.len(), 1);
    assert_eq!(curve[0].x, 0);
    assert_eq!(curve[0].y, 0.0);
    assert_eq!(curve[0].sig, Some(Significance { p: 1.0 }));
}

#[rstest]
#[case(10, 9)]
#[case(17, 16)]
#[case(40, 16)]
fn active_info_curve_covers_history_bound(#[case] n: usize, #[case] k_max: usize) {
    let config = quick_config(10);
    let xs = random_binary(n, n as u64);
    let mut rng = StdRng::seed_from_u64(5);
    let curve = CurveBuilder::new(&config).active_info(xs.view(), &mut rng).unwrap();
    assert_eq!(curve.len(), k_max);
    for (i, p) in curve.iter().enumerate() {
        assert_eq!(p.x, i as i64 + 1);
        assert_eq!(p.sig.is_some(), p.x < 6);
    }
}

#[test]
fn active_info_curve_of_single_sample_is_empty() {
    let config = quick_config(10);
    let mut rng = StdRng::seed_from_u64(6);
    let curve = CurveBuilder::new(&config)
        .active_info(array![0u8].view(), &mut rng)
        .unwrap();
    assert!(curve.is_empty());
}

#[test]
fn transfer_entropy_curve_tests_short_histories_only() {
    let config = quick_config(10);
    let xs = random_binary(30, 7);
    let ys = random_binary(30, 8);
    let mut rng = StdRng::seed_from_u64(7);
    let curve = CurveBuilder::new(&config)
        .transfer_entropy(xs.view(), ys.view(), &mut rng)
        .unwrap();
    assert_eq!(curve.len(), 16);
    let with_sig: Vec<i64> = curve.iter().filter(|p| p.sig.is_some()).map(|p| p.x).collect();
    assert_eq!(with_sig, vec![1, 2]);
    assert!(curve.iter().all(|p| p.y >= -1e-9));
}

#[test]
fn transfer_entropy_curve_is_bounded_by_the_shorter_series() {
    let config = quick_config(10);
    let xs = random_binary(30, 9);
    let ys = random_binary(12, 10);
    let mut rng = StdRng::seed_from_u64(9);
    let curve = CurveBuilder::new(&config)
        .transfer_entropy(xs.view(), ys.view(), &mut rng)
        .unwrap();
    assert_eq!(curve.len(), 11);
    assert_eq!(curve.last().map(|p| p.x), Some(11));
}

#[test]
fn curves_reject_mismatched_series() {
    let config = quick_config(10);
    let builder = CurveBuilder::new(&config);
    let mut rng = StdRng::seed_from_u64(8);
    let err = builder
        .cross_correlation(array![0u8, 1, 1].view(), array![0u8, 1].view(), &mut rng)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    let err = builder
        .transfer_entropy(array![0u8, 1, 1].view(), array![0u8, 1, 5].view(), &mut rng)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn points_without_sig_omit_the_field() {
    let bare = CurvePoint {
        x: 3,
        y: 0.5,
        sig: None,
    };
    assert_eq!(serde_json::to_string(&bare).unwrap(), r#"{"x":3,"y":0.5}"#);

    let tested = CurvePoint {
        x: 0,
        y: 1.0,
        sig: Some(Significance { p: 0.001 }),
    };
    assert_eq!(
        serde_json::to_string(&tested).unwrap(),
        r#"{"x":0,"y":1.0,"sig":{"p":0.001}}"#
    );
}
