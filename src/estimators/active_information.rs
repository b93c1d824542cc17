use ndarray::ArrayView1;
use rand::Rng;

use crate::error::{CaimError, Result};
use crate::estimators::approaches::discrete::DiscreteActiveInformation;
use crate::estimators::approaches::discrete::discrete_utils::validate_binary;
use crate::estimators::significance::{SignificantValue, permutation_test};
use crate::estimators::traits::GlobalValue;

/// Reject history lengths that leave no future sample, or that are zero.
pub(crate) fn validate_history(hist_len: usize, n: usize) -> Result<()> {
    if hist_len == 0 {
        return Err(CaimError::range("history length must be positive"));
    }
    if hist_len >= n {
        return Err(CaimError::range(format!(
            "history length {hist_len} must be less than the series length {n}"
        )));
    }
    if hist_len > crate::config::MAX_SUPPORTED_HISTORY {
        return Err(CaimError::range(format!(
            "history length {hist_len} exceeds the supported maximum {}",
            crate::config::MAX_SUPPORTED_HISTORY
        )));
    }
    Ok(())
}

pub struct ActiveInformation;

impl ActiveInformation {
    /// Create an active information estimator with history length `hist_len`.
    pub fn new_binary(
        xs: ArrayView1<'_, u8>,
        hist_len: usize,
    ) -> Result<DiscreteActiveInformation> {
        validate_binary("xs", xs)?;
        validate_history(hist_len, xs.len())?;
        Ok(DiscreteActiveInformation::new(xs, hist_len))
    }
}

/// Active information of a binary series with history length `hist_len`, in bits.
pub fn active_information(xs: ArrayView1<'_, u8>, hist_len: usize) -> Result<f64> {
    Ok(ActiveInformation::new_binary(xs, hist_len)?.global_value())
}

/// Active information with a permutation test that shuffles next values against histories.
pub fn active_information_with_significance(
    xs: ArrayView1<'_, u8>,
    hist_len: usize,
    permutations: usize,
) -> Result<SignificantValue> {
    active_information_with_rng(xs, hist_len, permutations, &mut rand::thread_rng())
}

/// [`active_information_with_significance`] drawing surrogates from `rng`.
pub fn active_information_with_rng<R: Rng + ?Sized>(
    xs: ArrayView1<'_, u8>,
    hist_len: usize,
    permutations: usize,
    rng: &mut R,
) -> Result<SignificantValue> {
    let estimator = ActiveInformation::new_binary(xs, hist_len)?;
    permutation_test(&estimator, permutations, rng)
}
