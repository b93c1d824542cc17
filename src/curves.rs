// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lag and history-length sweeps.
//!
//! Each curve is an ordered list of [`CurvePoint`]s ready for plotting: `x` is the lag
//! (cross-correlation) or the history length (active information, transfer entropy),
//! `y` the estimate in bits, and `sig` the permutation p-value where one was computed.

use std::time::Instant;

use ndarray::{ArrayView1, s};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::estimators::approaches::discrete::discrete_utils::{validate_binary, validate_same_length};
use crate::estimators::significance::{Significance, SignificantValue};
use crate::estimators::{
    active_information, active_information_with_rng, mutual_information,
    mutual_information_with_rng, transfer_entropy, transfer_entropy_with_rng,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: i64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sig: Option<Significance>,
}

impl CurvePoint {
    fn from_value(x: i64, value: SignificantValue) -> Self {
        Self {
            x,
            y: value.value,
            sig: value.sig,
        }
    }
}

pub type Curve = Vec<CurvePoint>;

/// Find the point at `x`, if the curve has one.
pub fn point_at(curve: &[CurvePoint], x: i64) -> Option<&CurvePoint> {
    curve.iter().find(|p| p.x == x)
}

/// Builds cross-correlation and history curves under one [`AnalysisConfig`].
pub struct CurveBuilder<'c> {
    config: &'c AnalysisConfig,
}

impl<'c> CurveBuilder<'c> {
    pub fn new(config: &'c AnalysisConfig) -> Self {
        Self { config }
    }

    /// Largest lag of a cross-correlation curve over `n` samples: `min(ceil(n / 4), n - 1)`.
    pub fn max_lag(n: usize) -> usize {
        n.div_ceil(4).min(n.saturating_sub(1))
    }

    /// Time-lagged mutual information for lags `-M..=M`.
    ///
    /// A positive lag `L` pairs `xs[L..]` with `ys[..N-L]` (`ys` lags `xs`); a negative lag
    /// pairs `xs[..N-L]` with `ys[L..]`.
    pub fn cross_correlation<R: Rng + ?Sized>(
        &self,
        xs: ArrayView1<'_, u8>,
        ys: ArrayView1<'_, u8>,
        rng: &mut R,
    ) -> Result<Curve> {
        validate_same_length(xs, ys)?;
        validate_binary("xs", xs)?;
        validate_binary("ys", ys)?;

        let start = Instant::now();
        let n = xs.len();
        let m = Self::max_lag(n);
        let mut curve = Vec::with_capacity(2 * m + 1);

        for lag in (1..=m).rev() {
            let value = self.lagged_mi(xs.slice(s![..n - lag]), ys.slice(s![lag..]), lag, rng)?;
            curve.push(CurvePoint::from_value(-(lag as i64), value));
        }
        for lag in 0..=m {
            let value = self.lagged_mi(xs.slice(s![lag..]), ys.slice(s![..n - lag]), lag, rng)?;
            curve.push(CurvePoint::from_value(lag as i64, value));
        }

        trace!(
            target: "caim::curves",
            n,
            points = curve.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "cross-correlation curve"
        );
        Ok(curve)
    }

    fn lagged_mi<R: Rng + ?Sized>(
        &self,
        xs: ArrayView1<'_, u8>,
        ys: ArrayView1<'_, u8>,
        lag: usize,
        rng: &mut R,
    ) -> Result<SignificantValue> {
        if lag <= self.config.mi_significance_max_lag {
            mutual_information_with_rng(xs, ys, self.config.permutations, rng)
        } else {
            mutual_information(xs, ys).map(SignificantValue::bare)
        }
    }

    /// Active information for history lengths `1..=K`, `K = min(max_history, N - 1)`.
    pub fn active_info<R: Rng + ?Sized>(&self, xs: ArrayView1<'_, u8>, rng: &mut R) -> Result<Curve> {
        validate_binary("xs", xs)?;

        let start = Instant::now();
        let k_max = self.config.history_bound(xs.len());
        let mut curve = Vec::with_capacity(k_max);
        for k in 1..=k_max {
            let value = if k < self.config.ai_significance_below {
                active_information_with_rng(xs, k, self.config.permutations, rng)?
            } else {
                SignificantValue::bare(active_information(xs, k)?)
            };
            curve.push(CurvePoint::from_value(k as i64, value));
        }

        trace!(
            target: "caim::curves",
            n = xs.len(),
            points = curve.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "active information curve"
        );
        Ok(curve)
    }

    /// Transfer entropy `ys -> xs` for history lengths `1..=K`, with `K` bounded by the
    /// shorter series.
    pub fn transfer_entropy<R: Rng + ?Sized>(
        &self,
        xs: ArrayView1<'_, u8>,
        ys: ArrayView1<'_, u8>,
        rng: &mut R,
    ) -> Result<Curve> {
        validate_binary("xs", xs)?;
        validate_binary("ys", ys)?;

        let start = Instant::now();
        let n = xs.len().min(ys.len());
        let k_max = self.config.history_bound(n);
        let mut curve = Vec::with_capacity(k_max);
        for k in 1..=k_max {
            let value = if k < self.config.te_significance_below {
                transfer_entropy_with_rng(xs, ys, k, self.config.permutations, rng)?
            } else {
                SignificantValue::bare(transfer_entropy(xs, ys, k)?)
            };
            curve.push(CurvePoint::from_value(k as i64, value));
        }

        trace!(
            target: "caim::curves",
            n,
            points = curve.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "transfer entropy curve"
        );
        Ok(curve)
    }
}

/// Cross-correlation curve with the default configuration.
pub fn cross_correlation_curve(xs: ArrayView1<'_, u8>, ys: ArrayView1<'_, u8>) -> Result<Curve> {
    CurveBuilder::new(&AnalysisConfig::default()).cross_correlation(xs, ys, &mut rand::thread_rng())
}

/// Active information curve with the default configuration.
pub fn active_info_curve(xs: ArrayView1<'_, u8>) -> Result<Curve> {
    CurveBuilder::new(&AnalysisConfig::default()).active_info(xs, &mut rand::thread_rng())
}

/// Transfer entropy (`ys -> xs`) curve with the default configuration.
pub fn transfer_entropy_curve(xs: ArrayView1<'_, u8>, ys: ArrayView1<'_, u8>) -> Result<Curve> {
    CurveBuilder::new(&AnalysisConfig::default()).transfer_entropy(xs, ys, &mut rand::thread_rng())
}
