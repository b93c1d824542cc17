// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

// Discrete (plug-in) estimators over integer code columns.

pub mod discrete_utils;
pub mod mle;

use ndarray::{Array1, ArrayView1};

use crate::estimators::approaches::discrete::discrete_utils::{
    entropy_bits, pack_pair, pair_entropy_bits, to_codes,
};
use crate::estimators::approaches::discrete::mle::DiscreteEntropy;
use crate::estimators::traits::{GlobalValue, LocalValues, Surrogate};
use crate::estimators::utils::te_slicing::{ai_observations, te_observations};

/// Discrete Mutual Information estimator using the entropy-summation formula, in bits.
///
/// I(X; Y) = H(X) + H(Y) - H(X, Y). `X` and `Y` are aligned code columns; `y_bits` is the
/// number of bits needed to hold any `Y` code, used to pack joint symbols.
///
/// The `Y` column is the one permuted by significance tests.
pub struct DiscreteMutualInformation {
    x: Vec<u64>,
    y: Vec<u64>,
    y_bits: u32,
    h_x: f64,
    h_y: f64,
}

impl DiscreteMutualInformation {
    pub fn new(x: Vec<u64>, y: Vec<u64>, y_bits: u32) -> Self {
        debug_assert_eq!(x.len(), y.len());
        let h_x = entropy_bits(&x);
        let h_y = entropy_bits(&y);
        Self {
            x,
            y,
            y_bits,
            h_x,
            h_y,
        }
    }

    /// Mutual information between two binary series.
    pub fn from_binary(xs: ArrayView1<'_, u8>, ys: ArrayView1<'_, u8>) -> Self {
        Self::new(to_codes(xs), to_codes(ys), 1)
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    fn value_with(&self, y: &[u64]) -> f64 {
        let h_xy = pair_entropy_bits(&self.x, y, self.y_bits);
        // Plug-in MI is non-negative; clamp round-off.
        (self.h_x + self.h_y - h_xy).max(0.0)
    }
}

impl GlobalValue for DiscreteMutualInformation {
    fn global_value(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.value_with(&self.y)
    }
}

impl LocalValues for DiscreteMutualInformation {
    fn local_values(&self) -> Array1<f64> {
        // i(x,y) = h(x) + h(y) - h(x,y)
        let mut res = DiscreteEntropy::new(self.x.clone()).local_values();
        res += &DiscreteEntropy::new(self.y.clone()).local_values();
        res -= &DiscreteEntropy::new(pack_pair(&self.x, &self.y, self.y_bits)).local_values();
        res
    }
}

impl Surrogate for DiscreteMutualInformation {
    fn permutable_column(&self) -> Vec<u64> {
        self.y.clone()
    }

    fn surrogate_value(&self, column: &[u64]) -> f64 {
        self.value_with(column)
    }
}

/// Discrete Conditional Mutual Information estimator using the entropy-summation formula.
///
/// I(X; Y | Z) = H(X, Z) + H(Y, Z) - H(X, Y, Z) - H(Z). The `X` column is the one permuted
/// by significance tests, so `H(Y, Z)` and `H(Z)` are computed once.
pub struct DiscreteConditionalMutualInformation {
    x: Vec<u64>,
    z: Vec<u64>,
    y_bits: u32,
    z_bits: u32,
    yz: Vec<u64>,
    h_yz: f64,
    h_z: f64,
}

impl DiscreteConditionalMutualInformation {
    pub fn new(x: Vec<u64>, y: Vec<u64>, z: Vec<u64>, y_bits: u32, z_bits: u32) -> Self {
        debug_assert!(x.len() == y.len() && y.len() == z.len());
        let yz = pack_pair(&y, &z, z_bits);
        let h_yz = entropy_bits(&yz);
        let h_z = entropy_bits(&z);
        Self {
            x,
            z,
            y_bits,
            z_bits,
            yz,
            h_yz,
            h_z,
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    fn value_with(&self, x: &[u64]) -> f64 {
        let h_xz = pair_entropy_bits(x, &self.z, self.z_bits);
        let h_xyz = pair_entropy_bits(x, &self.yz, self.y_bits + self.z_bits);
        (h_xz + self.h_yz - h_xyz - self.h_z).max(0.0)
    }
}

impl GlobalValue for DiscreteConditionalMutualInformation {
    fn global_value(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.value_with(&self.x)
    }
}

impl LocalValues for DiscreteConditionalMutualInformation {
    fn local_values(&self) -> Array1<f64> {
        let xz = pack_pair(&self.x, &self.z, self.z_bits);
        let xyz = pack_pair(&self.x, &self.yz, self.y_bits + self.z_bits);
        let mut res = DiscreteEntropy::new(xz).local_values();
        res += &DiscreteEntropy::new(self.yz.clone()).local_values();
        res -= &DiscreteEntropy::new(xyz).local_values();
        res -= &DiscreteEntropy::new(self.z.clone()).local_values();
        res
    }
}

impl Surrogate for DiscreteConditionalMutualInformation {
    fn permutable_column(&self) -> Vec<u64> {
        self.x.clone()
    }

    fn surrogate_value(&self, column: &[u64]) -> f64 {
        self.value_with(column)
    }
}

/// Discrete Active Information estimator: I(X_past^k; X_next).
pub struct DiscreteActiveInformation {
    inner: DiscreteMutualInformation,
}

impl DiscreteActiveInformation {
    /// `hist_len` must be in `1..series.len()`; callers validate.
    pub fn new(series: ArrayView1<'_, u8>, hist_len: usize) -> Self {
        let (future, history) = ai_observations(series, hist_len);
        // History is X, the next value is Y: surrogates shuffle next values against histories.
        Self {
            inner: DiscreteMutualInformation::new(history, future, 1),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl GlobalValue for DiscreteActiveInformation {
    fn global_value(&self) -> f64 {
        self.inner.global_value()
    }
}

impl LocalValues for DiscreteActiveInformation {
    fn local_values(&self) -> Array1<f64> {
        self.inner.local_values()
    }
}

impl Surrogate for DiscreteActiveInformation {
    fn permutable_column(&self) -> Vec<u64> {
        self.inner.permutable_column()
    }

    fn surrogate_value(&self, column: &[u64]) -> f64 {
        self.inner.surrogate_value(column)
    }
}

/// Discrete Transfer Entropy estimator using the entropy-summation formula (via CMI).
///
/// TE(source -> destination) = I(source_past; destination_next | destination_past).
pub struct DiscreteTransferEntropy {
    inner: DiscreteConditionalMutualInformation,
}

impl DiscreteTransferEntropy {
    pub fn new(
        source: ArrayView1<'_, u8>,
        destination: ArrayView1<'_, u8>,
        src_hist_len: usize,
        dest_hist_len: usize,
    ) -> Self {
        let obs = te_observations(source, destination, src_hist_len, dest_hist_len);
        let inner = DiscreteConditionalMutualInformation::new(
            obs.src_history,
            obs.dest_future,
            obs.dest_history,
            1,
            dest_hist_len as u32,
        );
        Self { inner }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl GlobalValue for DiscreteTransferEntropy {
    fn global_value(&self) -> f64 {
        self.inner.global_value()
    }
}

impl LocalValues for DiscreteTransferEntropy {
    fn local_values(&self) -> Array1<f64> {
        self.inner.local_values()
    }
}

impl Surrogate for DiscreteTransferEntropy {
    fn permutable_column(&self) -> Vec<u64> {
        self.inner.permutable_column()
    }

    fn surrogate_value(&self, column: &[u64]) -> f64 {
        self.inner.surrogate_value(column)
    }
}
