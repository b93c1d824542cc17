// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use caim::binning::{BinnerId, bin_extremes};
use caim::config::AnalysisConfig;
use caim::curves::point_at;
use caim::error::ErrorKind;
use caim::session::{AnalysisKind, CacheState, Point, Region, Session, Shape};
use ndarray::{Array1, Array2, array};

use crate::test_helpers::{assert_abs_diff_eq, gaussian_series, quick_config, square_wave_brightness};

fn cell(i: i64) -> Region {
    Shape::rectangle(Point::new(i, 0), Point::new(i + 1, 1)).into()
}

fn session(permutations: usize) -> Session {
    Session::with_seed(quick_config(permutations), 7)
        .unwrap()
        .with_binner(BinnerId::MeanThreshold)
}

fn fill(session: &mut Session, regions: usize, len: usize) {
    for i in 0..regions {
        let series = gaussian_series(len, 0.5, 0.1, 100 + i as u64);
        session.push_region(cell(i as i64), vec![series]).unwrap();
    }
}

#[test]
fn identical_regions_share_significant_information() {
    let mut session = Session::with_seed(AnalysisConfig::default(), 42)
        .unwrap()
        .with_binner(BinnerId::MeanThreshold);
    session.push_region(cell(0), vec![square_wave_brightness()]).unwrap();
    session.push_region(cell(1), vec![square_wave_brightness()]).unwrap();
    assert_eq!(session.binned()[0], array![0u8, 0, 1, 1, 0, 0, 1, 1]);
    assert_eq!(session.binned()[0], session.binned()[1]);

    assert_eq!(session.open(AnalysisKind::MutualInfo).unwrap(), CacheState::Computed);
    let mi = session.analyses().mutual_info.as_ref().unwrap();
    let lag0 = point_at(mi.get(0, 1).unwrap(), 0).unwrap();
    assert!(lag0.y > 0.9);
    assert!(lag0.sig.unwrap().p < 0.05, "p = {}", lag0.sig.unwrap().p);
}

#[test]
fn fresh_session_has_nothing_cached() {
    let session = session(10);
    assert!(session.is_empty());
    for kind in AnalysisKind::ALL {
        assert_eq!(session.state(kind), CacheState::Absent);
        assert!(!session.is_open(kind));
    }
}

#[test]
fn opening_an_empty_session_waits_for_series() {
    let mut session = session(10);
    assert_eq!(session.open(AnalysisKind::ActiveInfo).unwrap(), CacheState::Absent);
    assert!(session.is_open(AnalysisKind::ActiveInfo));

    fill(&mut session, 1, 12);
    assert_eq!(session.state(AnalysisKind::ActiveInfo), CacheState::Computed);
    assert_eq!(session.analyses().active_info.as_ref().unwrap().region_count(), 1);
}

#[test]
fn open_analyses_follow_pushes_and_pops() {
    let mut session = session(10);
    fill(&mut session, 2, 16);
    session.open(AnalysisKind::MutualInfo).unwrap();
    session.open(AnalysisKind::TransferEntropy).unwrap();

    let mi = session.analyses().mutual_info.as_ref().unwrap();
    assert_eq!(mi.region_count(), 2);
    assert_eq!(mi.0[&0].keys().copied().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(mi.0[&1].keys().copied().collect::<Vec<_>>(), vec![1]);

    fill(&mut session, 1, 16);
    assert_eq!(session.series_count(), 3);
    let te = session.analyses().transfer_entropy.as_ref().unwrap();
    assert_eq!(te.region_count(), 3);
    assert!(te.0.values().all(|row| row.len() == 3));

    let removed = session.pop_region().unwrap();
    assert!(removed.is_some());
    assert_eq!(session.analyses().mutual_info.as_ref().unwrap().region_count(), 2);
    assert_eq!(session.analyses().transfer_entropy.as_ref().unwrap().region_count(), 2);
}

#[test]
fn closed_analyses_are_discarded_on_mutation() {
    let mut session = session(10);
    fill(&mut session, 2, 12);
    session.open(AnalysisKind::ActiveInfo).unwrap();
    session.close(AnalysisKind::ActiveInfo);
    assert_eq!(session.state(AnalysisKind::ActiveInfo), CacheState::Computed);

    fill(&mut session, 1, 12);
    assert_eq!(session.state(AnalysisKind::ActiveInfo), CacheState::Absent);

    assert_eq!(session.open(AnalysisKind::ActiveInfo).unwrap(), CacheState::Computed);
    assert_eq!(session.analyses().active_info.as_ref().unwrap().region_count(), 3);
}

#[test]
fn popping_the_last_region_empties_the_cache() {
    let mut session = session(10);
    fill(&mut session, 1, 12);
    session.open(AnalysisKind::MutualInfo).unwrap();
    session.pop_region().unwrap();
    assert!(session.is_empty());
    assert_eq!(session.state(AnalysisKind::MutualInfo), CacheState::Absent);
    assert!(session.pop_region().unwrap().is_none());
}

#[test]
fn clear_resets_every_analysis_to_absent() {
    let mut session = session(10);
    fill(&mut session, 2, 12);
    for kind in AnalysisKind::ALL {
        assert_eq!(session.open(kind).unwrap(), CacheState::Computed);
    }

    session.clear();
    assert!(session.is_empty());
    assert_eq!(session.region_count(), 0);
    for kind in AnalysisKind::ALL {
        assert_eq!(session.state(kind), CacheState::Absent);
        assert!(!session.is_open(kind));
    }

    fill(&mut session, 1, 12);
    assert_eq!(session.state(AnalysisKind::MutualInfo), CacheState::Absent);
    session.open(AnalysisKind::MutualInfo).unwrap();
    assert_eq!(session.analyses().mutual_info.as_ref().unwrap().region_count(), 1);
}

#[test]
fn feature_groups_push_and_pop_all_their_series() {
    let mut session = session(10);
    fill(&mut session, 1, 12);
    let grid = Region::grid(Point::new(0, 0), Point::new(4, 4), 2, 2).unwrap();
    let series = (0..4).map(|i| gaussian_series(12, 0.5, 0.1, i)).collect();
    session.push_region(grid, series).unwrap();
    assert_eq!(session.region_count(), 2);
    assert_eq!(session.series_count(), 5);

    session.open(AnalysisKind::ActiveInfo).unwrap();
    assert_eq!(session.analyses().active_info.as_ref().unwrap().region_count(), 5);

    let removed = session.pop_region().unwrap().unwrap();
    assert!(removed.is_feature_group());
    assert_eq!(session.series_count(), 1);
    assert_eq!(session.binned().len(), 1);
    assert_eq!(session.analyses().active_info.as_ref().unwrap().region_count(), 1);
}

#[test]
fn rejected_push_leaves_session_untouched() {
    let mut session = session(10);
    fill(&mut session, 1, 12);

    let err = session
        .push_region(cell(5), vec![gaussian_series(13, 0.5, 0.1, 1)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let mut bad = gaussian_series(12, 0.5, 0.1, 2);
    bad[3] = f64::NAN;
    let err = session.push_region(cell(5), vec![bad]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = session
        .push_region(cell(5), vec![gaussian_series(12, 0.5, 0.1, 3); 2])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    assert_eq!(session.region_count(), 1);
    assert_eq!(session.series_count(), 1);
    assert_eq!(session.binned().len(), 1);
}

#[test]
fn rebin_with_same_method_is_a_no_op() {
    let mut session = session(10);
    fill(&mut session, 2, 12);
    session.open(AnalysisKind::MutualInfo).unwrap();
    let before = session.snapshot();

    session.rebin(BinnerId::MeanThreshold).unwrap();
    assert_eq!(session.snapshot(), before);
}

#[test]
fn rebin_recomputes_series_and_open_analyses() {
    let mut session = session(10);
    fill(&mut session, 2, 12);
    session.open(AnalysisKind::TransferEntropy).unwrap();

    session.rebin(BinnerId::Extremes).unwrap();
    assert_eq!(session.binner(), BinnerId::Extremes);
    for (ts, binned) in session.timeseries().iter().zip(session.binned()) {
        assert_eq!(*binned, bin_extremes(ts.view()).unwrap());
    }
    assert_eq!(session.state(AnalysisKind::TransferEntropy), CacheState::Computed);
    assert_eq!(session.state(AnalysisKind::MutualInfo), CacheState::Absent);
}

#[test]
fn summary_cells_use_lag_zero_and_reported_history() {
    let mut session = session(10);
    fill(&mut session, 2, 12);
    session.open(AnalysisKind::MutualInfo).unwrap();
    session.open(AnalysisKind::TransferEntropy).unwrap();
    let config = session.config().clone();

    let mi = session.analyses().mutual_info.as_ref().unwrap();
    let cells = mi.summary_at(AnalysisKind::MutualInfo.summary_x(&config));
    assert_eq!(cells.keys().copied().collect::<Vec<_>>(), vec![(0, 0), (0, 1), (1, 1)]);
    assert!(cells.values().all(|p| p.sig.is_some()));

    let te = session.analyses().transfer_entropy.as_ref().unwrap();
    let cells = te.summary_at(AnalysisKind::TransferEntropy.summary_x(&config));
    assert_eq!(cells.len(), 4);
    assert!(cells.values().all(|p| p.x == 2 && p.sig.is_some()));
}

#[test]
fn shapes_are_sampled_from_frames() {
    let frames: Vec<Array2<u8>> = (0..10u8)
        .map(|t| Array2::from_elem((4, 4), t * 20))
        .collect();
    let mut session = session(10);
    let region: Region = Shape::rectangle(Point::new(0, 0), Point::new(1, 1)).into();
    session.push_shape(region, &frames).unwrap();

    let expected: Array1<f64> = (0..10).map(|t| f64::from(t * 20) / 255.0).collect();
    for (got, want) in session.timeseries()[0].iter().zip(expected.iter()) {
        assert_abs_diff_eq!(*got, *want, epsilon = 1e-12);
    }
    assert_eq!(session.binned()[0], array![0u8, 0, 0, 0, 0, 1, 1, 1, 1, 1]);
}

#[test]
fn with_binner_only_applies_to_empty_sessions() {
    let mut session = session(10);
    fill(&mut session, 1, 12);
    let session = session.with_binner(BinnerId::Extremes);
    assert_eq!(session.binner(), BinnerId::MeanThreshold);
}
