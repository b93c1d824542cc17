// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cached analysis results.
//!
//! Matrices and vectors are keyed by series index. Serialized, the keys become decimal
//! strings and curve points `{ "x": .., "y": .., "sig": { "p": .. } }`.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::binning::BinnedSeries;
use crate::config::AnalysisConfig;
use crate::curves::{Curve, CurveBuilder, CurvePoint, point_at};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    MutualInfo,
    ActiveInfo,
    TransferEntropy,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 3] = [
        AnalysisKind::MutualInfo,
        AnalysisKind::ActiveInfo,
        AnalysisKind::TransferEntropy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisKind::MutualInfo => "mutual_info",
            AnalysisKind::ActiveInfo => "active_info",
            AnalysisKind::TransferEntropy => "transfer_entropy",
        }
    }

    /// The `x` of the curve point shown in summary cells: lag 0 for mutual information,
    /// `reported_history` for the history curves.
    pub fn summary_x(self, config: &AnalysisConfig) -> i64 {
        match self {
            AnalysisKind::MutualInfo => 0,
            AnalysisKind::ActiveInfo | AnalysisKind::TransferEntropy => {
                config.reported_history as i64
            }
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Absent,
    Computed,
}

/// Lagged mutual information curves for every pair `source <= target`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MutualInfoMatrix(pub BTreeMap<usize, BTreeMap<usize, Curve>>);

impl MutualInfoMatrix {
    pub fn compute<R: Rng + ?Sized>(
        binned: &[BinnedSeries],
        builder: &CurveBuilder<'_>,
        rng: &mut R,
    ) -> Result<Self> {
        let mut rows = BTreeMap::new();
        for (source, xs) in binned.iter().enumerate() {
            let mut row = BTreeMap::new();
            for (target, ys) in binned.iter().enumerate().skip(source) {
                row.insert(target, builder.cross_correlation(xs.view(), ys.view(), rng)?);
            }
            rows.insert(source, row);
        }
        Ok(Self(rows))
    }

    pub fn get(&self, source: usize, target: usize) -> Option<&Curve> {
        self.0.get(&source)?.get(&target)
    }

    pub fn region_count(&self) -> usize {
        self.0.len()
    }

    /// The point at `x` of every curve that has one.
    pub fn summary_at(&self, x: i64) -> BTreeMap<(usize, usize), CurvePoint> {
        matrix_summary(&self.0, x)
    }

    fn is_consistent(&self, n: usize) -> bool {
        self.0.len() == n
            && self
                .0
                .iter()
                .all(|(&s, row)| s < n && row.keys().copied().eq(s..n))
    }
}

/// Active information curve for every series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveInfoVector(pub BTreeMap<usize, Curve>);

impl ActiveInfoVector {
    pub fn compute<R: Rng + ?Sized>(
        binned: &[BinnedSeries],
        builder: &CurveBuilder<'_>,
        rng: &mut R,
    ) -> Result<Self> {
        let mut out = BTreeMap::new();
        for (i, xs) in binned.iter().enumerate() {
            out.insert(i, builder.active_info(xs.view(), rng)?);
        }
        Ok(Self(out))
    }

    pub fn get(&self, index: usize) -> Option<&Curve> {
        self.0.get(&index)
    }

    pub fn region_count(&self) -> usize {
        self.0.len()
    }

    pub fn summary_at(&self, x: i64) -> BTreeMap<usize, CurvePoint> {
        self.0
            .iter()
            .filter_map(|(&i, curve)| point_at(curve, x).map(|p| (i, *p)))
            .collect()
    }

    fn is_consistent(&self, n: usize) -> bool {
        self.0.keys().copied().eq(0..n)
    }
}

/// Transfer entropy curves for every ordered pair; `[source][target]` holds
/// TE(source -> target).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferEntropyMatrix(pub BTreeMap<usize, BTreeMap<usize, Curve>>);

impl TransferEntropyMatrix {
    pub fn compute<R: Rng + ?Sized>(
        binned: &[BinnedSeries],
        builder: &CurveBuilder<'_>,
        rng: &mut R,
    ) -> Result<Self> {
        let mut rows = BTreeMap::new();
        for (source, ys) in binned.iter().enumerate() {
            let mut row = BTreeMap::new();
            for (target, xs) in binned.iter().enumerate() {
                row.insert(target, builder.transfer_entropy(xs.view(), ys.view(), rng)?);
            }
            rows.insert(source, row);
        }
        Ok(Self(rows))
    }

    pub fn get(&self, source: usize, target: usize) -> Option<&Curve> {
        self.0.get(&source)?.get(&target)
    }

    pub fn region_count(&self) -> usize {
        self.0.len()
    }

    pub fn summary_at(&self, x: i64) -> BTreeMap<(usize, usize), CurvePoint> {
        matrix_summary(&self.0, x)
    }

    fn is_consistent(&self, n: usize) -> bool {
        self.0.keys().copied().eq(0..n)
            && self.0.values().all(|row| row.keys().copied().eq(0..n))
    }
}

fn matrix_summary(
    rows: &BTreeMap<usize, BTreeMap<usize, Curve>>,
    x: i64,
) -> BTreeMap<(usize, usize), CurvePoint> {
    rows.iter()
        .flat_map(|(&s, row)| {
            row.iter()
                .filter_map(move |(&t, curve)| point_at(curve, x).map(|p| ((s, t), *p)))
        })
        .collect()
}

/// One computed analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum AnalysisResult {
    MutualInfo(MutualInfoMatrix),
    ActiveInfo(ActiveInfoVector),
    TransferEntropy(TransferEntropyMatrix),
}

impl AnalysisResult {
    /// Compute `kind` over `binned`. Callers make sure `binned` is non-empty.
    pub fn compute<R: Rng + ?Sized>(
        kind: AnalysisKind,
        binned: &[BinnedSeries],
        config: &AnalysisConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let builder = CurveBuilder::new(config);
        Ok(match kind {
            AnalysisKind::MutualInfo => {
                AnalysisResult::MutualInfo(MutualInfoMatrix::compute(binned, &builder, rng)?)
            }
            AnalysisKind::ActiveInfo => {
                AnalysisResult::ActiveInfo(ActiveInfoVector::compute(binned, &builder, rng)?)
            }
            AnalysisKind::TransferEntropy => AnalysisResult::TransferEntropy(
                TransferEntropyMatrix::compute(binned, &builder, rng)?,
            ),
        })
    }

    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisResult::MutualInfo(_) => AnalysisKind::MutualInfo,
            AnalysisResult::ActiveInfo(_) => AnalysisKind::ActiveInfo,
            AnalysisResult::TransferEntropy(_) => AnalysisKind::TransferEntropy,
        }
    }

    pub fn region_count(&self) -> usize {
        match self {
            AnalysisResult::MutualInfo(m) => m.region_count(),
            AnalysisResult::ActiveInfo(v) => v.region_count(),
            AnalysisResult::TransferEntropy(m) => m.region_count(),
        }
    }

    /// Whether the index set is exactly the one computed for `n` series.
    pub fn is_consistent(&self, n: usize) -> bool {
        match self {
            AnalysisResult::MutualInfo(m) => m.is_consistent(n),
            AnalysisResult::ActiveInfo(v) => v.is_consistent(n),
            AnalysisResult::TransferEntropy(m) => m.is_consistent(n),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Persisted analyses of a session; each kind is present only while computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analyses {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutual_info: Option<MutualInfoMatrix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_info: Option<ActiveInfoVector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_entropy: Option<TransferEntropyMatrix>,
}

impl Analyses {
    pub fn state(&self, kind: AnalysisKind) -> CacheState {
        let present = match kind {
            AnalysisKind::MutualInfo => self.mutual_info.is_some(),
            AnalysisKind::ActiveInfo => self.active_info.is_some(),
            AnalysisKind::TransferEntropy => self.transfer_entropy.is_some(),
        };
        if present {
            CacheState::Computed
        } else {
            CacheState::Absent
        }
    }

    /// A copy of the cached result for `kind`, if any.
    pub fn get(&self, kind: AnalysisKind) -> Option<AnalysisResult> {
        match kind {
            AnalysisKind::MutualInfo => self.mutual_info.clone().map(AnalysisResult::MutualInfo),
            AnalysisKind::ActiveInfo => self.active_info.clone().map(AnalysisResult::ActiveInfo),
            AnalysisKind::TransferEntropy => self
                .transfer_entropy
                .clone()
                .map(AnalysisResult::TransferEntropy),
        }
    }

    pub fn insert(&mut self, result: AnalysisResult) {
        match result {
            AnalysisResult::MutualInfo(m) => self.mutual_info = Some(m),
            AnalysisResult::ActiveInfo(v) => self.active_info = Some(v),
            AnalysisResult::TransferEntropy(m) => self.transfer_entropy = Some(m),
        }
    }

    pub fn remove(&mut self, kind: AnalysisKind) {
        match kind {
            AnalysisKind::MutualInfo => self.mutual_info = None,
            AnalysisKind::ActiveInfo => self.active_info = None,
            AnalysisKind::TransferEntropy => self.transfer_entropy = None,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        AnalysisKind::ALL
            .iter()
            .all(|&k| self.state(k) == CacheState::Absent)
    }

    /// Kinds whose cached result does not cover exactly `n` series.
    pub fn inconsistent_kinds(&self, n: usize) -> Vec<AnalysisKind> {
        let stale = [
            self.mutual_info.as_ref().is_some_and(|m| !m.is_consistent(n)),
            self.active_info.as_ref().is_some_and(|v| !v.is_consistent(n)),
            self.transfer_entropy.as_ref().is_some_and(|m| !m.is_consistent(n)),
        ];
        AnalysisKind::ALL
            .into_iter()
            .zip(stale)
            .filter_map(|(kind, stale)| stale.then_some(kind))
            .collect()
    }
}
