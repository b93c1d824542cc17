// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # caim
//!
//! Information-theoretic analysis of region brightness time series: binarisation,
//! mutual information, active information and transfer entropy with permutation
//! significance tests, and a session cache that keeps analyses consistent while regions
//! are added and removed.
//!
//! ## Quick Start
//!
//! ```rust
//! use caim::binning::BinnerId;
//! use caim::estimators::mutual_information;
//! use ndarray::array;
//!
//! let brightness = array![0.1, 0.2, 0.9, 0.8, 0.1, 0.2, 0.9, 0.8];
//! let binned = BinnerId::MeanThreshold.bin(brightness.view()).unwrap();
//! assert_eq!(binned, array![0u8, 0, 1, 1, 0, 0, 1, 1]);
//!
//! let mi = mutual_information(binned.view(), binned.view()).unwrap();
//! assert!((mi - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Layers
//!
//! 1. **Binning** ([`binning`]): brightness series to 0/1 series (mean threshold, global
//!    extremes, extremes after moving-window detrending).
//! 2. **Estimators** ([`estimators`]): plug-in discrete MI / AI / TE in bits with local
//!    values and permutation tests.
//! 3. **Curves** ([`curves`]): lag sweeps (cross-correlation) and history-length sweeps.
//! 4. **Session** ([`session`]): regions, series and the per-kind analysis cache.
//!
//! Logging goes through `tracing` under the `caim::*` targets; call
//! [`telemetry::init_tracing`] to install a subscriber.

pub mod binning;
pub mod config;
pub mod curves;
pub mod error;
pub mod estimators;
pub mod session;
pub mod telemetry;

pub use binning::{BinnedSeries, BinnerId, TimeSeries, bin};
pub use config::AnalysisConfig;
pub use curves::{Curve, CurveBuilder, CurvePoint};
pub use error::{CaimError, ErrorKind, Result};
pub use estimators::{
    Significance, SignificantValue, active_information, mutual_information, transfer_entropy,
};
pub use session::{AnalysisKind, AnalysisResult, CacheState, Region, Session, Shape};
