// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session state: regions, their series, and the analysis cache.
//!
//! Each [`AnalysisKind`] is either [`CacheState::Absent`] or [`CacheState::Computed`].
//! Opening a kind registers an observer and computes it; every mutation (push, pop, rebin)
//! recomputes the observed kinds and discards the others, so a cached result always covers
//! exactly the current series. Clearing drops everything including the observers.

pub mod analysis;
pub mod selection;

use std::collections::BTreeSet;
use std::time::Instant;

use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::binning::{BinnedSeries, BinnerId, TimeSeries, validate_series};
use crate::config::AnalysisConfig;
use crate::curves::CurveBuilder;
use crate::error::{CaimError, Result};
use crate::estimators::approaches::discrete::discrete_utils::validate_binary;

pub use analysis::{
    ActiveInfoVector, Analyses, AnalysisKind, AnalysisResult, CacheState, MutualInfoMatrix,
    TransferEntropyMatrix,
};
pub use selection::{BoundingBox, Point, Region, Shape};

/// Everything a persistence layer needs to rebuild a [`Session`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub binning_method: BinnerId,
    pub regions: Vec<Region>,
    pub timeseries: Vec<TimeSeries>,
    pub binned: Vec<BinnedSeries>,
    pub analyses: Analyses,
}

impl SessionMetadata {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug)]
pub struct Session {
    config: AnalysisConfig,
    binner: BinnerId,
    regions: Vec<Region>,
    timeseries: Vec<TimeSeries>,
    binned: Vec<BinnedSeries>,
    analyses: Analyses,
    observers: BTreeSet<AnalysisKind>,
    rng: StdRng,
    budget_noticed: bool,
}

impl Session {
    /// Empty session drawing surrogates from an entropy-seeded generator.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Empty session with reproducible permutation tests.
    pub fn with_seed(config: AnalysisConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: AnalysisConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            binner: BinnerId::default(),
            regions: Vec::new(),
            timeseries: Vec::new(),
            binned: Vec::new(),
            analyses: Analyses::default(),
            observers: BTreeSet::new(),
            rng,
            budget_noticed: false,
        })
    }

    /// Set the binning method of an empty session.
    pub fn with_binner(mut self, binner: BinnerId) -> Self {
        if self.timeseries.is_empty() {
            self.binner = binner;
        }
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn binner(&self) -> BinnerId {
        self.binner
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn timeseries(&self) -> &[TimeSeries] {
        &self.timeseries
    }

    pub fn binned(&self) -> &[BinnedSeries] {
        &self.binned
    }

    /// Number of series; analyses are indexed by series.
    pub fn series_count(&self) -> usize {
        self.timeseries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timeseries.is_empty()
    }

    /// Add a region with one series per member shape.
    ///
    /// Nothing is modified unless every series is valid and as long as the series already
    /// in the session.
    pub fn push_region(&mut self, region: Region, series: Vec<TimeSeries>) -> Result<()> {
        if series.len() != region.series_count() {
            return Err(CaimError::invalid(format!(
                "region has {} shapes but {} series were given",
                region.series_count(),
                series.len()
            )));
        }
        let expected = self.timeseries.first().or(series.first()).map_or(0, |ts| ts.len());
        for ts in &series {
            validate_series(ts.view())?;
            if ts.len() != expected {
                return Err(CaimError::LengthMismatch {
                    left: expected,
                    right: ts.len(),
                });
            }
        }
        let binned = series
            .iter()
            .map(|ts| self.binner.bin_with(ts.view(), &self.config))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            target: "caim::session",
            series = series.len(),
            feature_group = region.is_feature_group(),
            "push region"
        );
        self.regions.push(region);
        self.timeseries.extend(series);
        self.binned.extend(binned);
        self.refresh()
    }

    /// Sample `region` over `frames` and add it.
    pub fn push_shape(&mut self, region: Region, frames: &[Array2<u8>]) -> Result<()> {
        let series = region.timeseries(frames)?;
        self.push_region(region, series)
    }

    /// Remove the most recent region together with all of its series.
    pub fn pop_region(&mut self) -> Result<Option<Region>> {
        let Some(region) = self.regions.pop() else {
            return Ok(None);
        };
        let keep = self.timeseries.len().saturating_sub(region.series_count());
        self.timeseries.truncate(keep);
        self.binned.truncate(keep);
        debug!(
            target: "caim::session",
            removed = region.series_count(),
            remaining = keep,
            "pop region"
        );
        self.refresh()?;
        Ok(Some(region))
    }

    /// Re-bin every series with `binner`; a no-op if it is already in use.
    pub fn rebin(&mut self, binner: BinnerId) -> Result<()> {
        if binner == self.binner {
            return Ok(());
        }
        let binned = self
            .timeseries
            .iter()
            .map(|ts| binner.bin_with(ts.view(), &self.config))
            .collect::<Result<Vec<_>>>()?;
        debug!(target: "caim::session", from = %self.binner, to = %binner, "rebin");
        self.binner = binner;
        self.binned = binned;
        self.refresh()
    }

    /// Drop all regions, series, cached analyses and observers.
    pub fn clear(&mut self) {
        self.regions.clear();
        self.timeseries.clear();
        self.binned.clear();
        self.analyses.clear();
        self.observers.clear();
        debug!(target: "caim::session", "cleared");
    }

    /// Register an observer for `kind`, computing it if needed.
    pub fn open(&mut self, kind: AnalysisKind) -> Result<CacheState> {
        self.observers.insert(kind);
        if self.analyses.state(kind) == CacheState::Absent && !self.binned.is_empty() {
            self.compute(kind)?;
        }
        Ok(self.analyses.state(kind))
    }

    /// Unregister the observer for `kind`. The cached result is discarded on the next
    /// mutation.
    pub fn close(&mut self, kind: AnalysisKind) {
        self.observers.remove(&kind);
    }

    pub fn is_open(&self, kind: AnalysisKind) -> bool {
        self.observers.contains(&kind)
    }

    pub fn state(&self, kind: AnalysisKind) -> CacheState {
        self.analyses.state(kind)
    }

    pub fn analyses(&self) -> &Analyses {
        &self.analyses
    }

    pub fn analysis(&self, kind: AnalysisKind) -> Option<AnalysisResult> {
        self.analyses.get(kind)
    }

    pub fn snapshot(&self) -> SessionMetadata {
        SessionMetadata {
            binning_method: self.binner,
            regions: self.regions.clone(),
            timeseries: self.timeseries.clone(),
            binned: self.binned.clone(),
            analyses: self.analyses.clone(),
        }
    }

    /// Rebuild a session from persisted metadata.
    ///
    /// # Errors
    /// `InvalidInput` if the regions, series and analyses disagree on the number or
    /// length of series, `Range` if a binned series is not binary.
    pub fn restore(config: AnalysisConfig, metadata: SessionMetadata) -> Result<Self> {
        Self::restore_with_rng(config, metadata, StdRng::from_entropy())
    }

    /// [`Session::restore`] with reproducible permutation tests.
    pub fn restore_with_seed(
        config: AnalysisConfig,
        metadata: SessionMetadata,
        seed: u64,
    ) -> Result<Self> {
        Self::restore_with_rng(config, metadata, StdRng::seed_from_u64(seed))
    }

    fn restore_with_rng(config: AnalysisConfig, metadata: SessionMetadata, rng: StdRng) -> Result<Self> {
        let SessionMetadata {
            binning_method,
            regions,
            timeseries,
            binned,
            analyses,
        } = metadata;

        let declared: usize = regions.iter().map(Region::series_count).sum();
        if declared != timeseries.len() || timeseries.len() != binned.len() {
            return Err(CaimError::invalid(format!(
                "regions declare {declared} series, found {} time series and {} binned",
                timeseries.len(),
                binned.len()
            )));
        }
        let len = timeseries.first().map_or(0, |ts| ts.len());
        for (ts, b) in timeseries.iter().zip(&binned) {
            validate_series(ts.view())?;
            if ts.len() != len || b.len() != len {
                return Err(CaimError::LengthMismatch {
                    left: len,
                    right: if ts.len() != len { ts.len() } else { b.len() },
                });
            }
            validate_binary("binned", b.view())?;
        }
        if let Some(kind) = analyses.inconsistent_kinds(timeseries.len()).first() {
            return Err(CaimError::invalid(format!(
                "{kind} analysis does not cover the {} stored series",
                timeseries.len()
            )));
        }

        let mut session = Self::with_rng(config, rng)?;
        session.binner = binning_method;
        session.regions = regions;
        session.timeseries = timeseries;
        session.binned = binned;
        session.analyses = analyses;
        Ok(session)
    }

    fn refresh(&mut self) -> Result<()> {
        for kind in AnalysisKind::ALL {
            if self.observers.contains(&kind) && !self.binned.is_empty() {
                self.compute(kind)?;
            } else {
                self.analyses.remove(kind);
            }
        }
        Ok(())
    }

    fn compute(&mut self, kind: AnalysisKind) -> Result<()> {
        self.notice_budget(kind);
        let start = Instant::now();
        match AnalysisResult::compute(kind, &self.binned, &self.config, &mut self.rng) {
            Ok(result) => {
                debug!(
                    target: "caim::session",
                    %kind,
                    series = self.binned.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "analysis recomputed"
                );
                self.analyses.insert(result);
                Ok(())
            }
            Err(err) => {
                self.analyses.remove(kind);
                Err(err)
            }
        }
    }

    fn notice_budget(&mut self, kind: AnalysisKind) {
        if self.budget_noticed {
            return;
        }
        let n = self.binned.first().map_or(0, |b| b.len());
        let config = &self.config;
        let omits = match kind {
            AnalysisKind::MutualInfo => CurveBuilder::max_lag(n) > config.mi_significance_max_lag,
            AnalysisKind::ActiveInfo => config.history_bound(n) >= config.ai_significance_below,
            AnalysisKind::TransferEntropy => {
                config.history_bound(n) >= config.te_significance_below
            }
        };
        if omits {
            info!(
                target: "caim::session",
                permutations = config.permutations,
                mi_max_lag = config.mi_significance_max_lag,
                ai_below = config.ai_significance_below,
                te_below = config.te_significance_below,
                "p-values are only estimated for short lags and history lengths"
            );
            self.budget_noticed = true;
        }
    }
}
