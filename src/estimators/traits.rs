// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::Array1;

pub trait GlobalValue {
    /// Compute and return the global value of the measure.
    fn global_value(&self) -> f64;
}

pub trait LocalValues: GlobalValue {
    /// Compute and return the local (per-observation) values of the measure.
    fn local_values(&self) -> Array1<f64>;

    /// Derive global_value as the mean of local values.
    fn global_from_local(&self) -> f64 {
        self.local_values().mean().unwrap_or(0.0)
    }
}

/// Estimators that can be re-evaluated with one of their columns shuffled.
///
/// This is the seam used by [`crate::estimators::significance::permutation_test`]: the
/// test obtains the permutable column once, shuffles it in place for every surrogate and
/// asks the estimator for the value of the measure under that shuffled column. Terms of
/// the measure that do not depend on the shuffled column are computed only once.
pub trait Surrogate: GlobalValue {
    /// A fresh copy of the column whose order is permuted.
    fn permutable_column(&self) -> Vec<u64>;

    /// The measure recomputed with `column` in place of the permutable column.
    fn surrogate_value(&self, column: &[u64]) -> f64;
}
