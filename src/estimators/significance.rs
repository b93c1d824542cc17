// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Permutation-based significance testing.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{CaimError, Result};
use crate::estimators::traits::Surrogate;

/// Surrogates within this distance below the observed value count as meeting it.
pub const TIE_TOLERANCE: f64 = 1e-12;

/// Default number of surrogates per test.
pub const DEFAULT_PERMUTATIONS: usize = 1000;

/// One-sided permutation p-value; lower is more significant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Significance {
    pub p: f64,
}

impl Significance {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p < alpha
    }
}

/// An estimator value with an optional significance estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignificantValue {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sig: Option<Significance>,
}

impl SignificantValue {
    pub fn bare(value: f64) -> Self {
        Self { value, sig: None }
    }
}

/// Compare the observed value of `estimator` against `permutations` surrogates.
///
/// The permutable column is copied once and shuffled in place for every surrogate.
/// `p` is the fraction of surrogates whose value meets or exceeds the observed one.
///
/// # Errors
/// `Range` if `permutations` is zero.
pub fn permutation_test<E, R>(estimator: &E, permutations: usize, rng: &mut R) -> Result<SignificantValue>
where
    E: Surrogate + ?Sized,
    R: Rng + ?Sized,
{
    if permutations == 0 {
        return Err(CaimError::range("permutation count must be positive"));
    }

    let observed = estimator.global_value();
    let mut column = estimator.permutable_column();
    let mut hits = 0usize;
    for _ in 0..permutations {
        column.shuffle(rng);
        if estimator.surrogate_value(&column) >= observed - TIE_TOLERANCE {
            hits += 1;
        }
    }

    Ok(SignificantValue {
        value: observed,
        sig: Some(Significance {
            p: hits as f64 / permutations as f64,
        }),
    })
}
