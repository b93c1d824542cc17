use ndarray::ArrayView1;
use rand::Rng;

use crate::error::Result;
use crate::estimators::active_information::validate_history;
use crate::estimators::approaches::discrete::DiscreteTransferEntropy;
use crate::estimators::approaches::discrete::discrete_utils::validate_binary;
use crate::estimators::significance::{SignificantValue, permutation_test};
use crate::estimators::traits::GlobalValue;

pub struct TransferEntropy;

impl TransferEntropy {
    /// Create a plug-in transfer entropy estimator for `source -> destination`, using
    /// `hist_len` past samples of both series.
    ///
    /// Series of unequal length are read up to the shorter one.
    ///
    /// # Errors
    /// `InvalidInput` for an empty series, `NotBinary` for non-binary values, `Range` if
    /// `hist_len` is zero or not less than the shorter series length.
    pub fn new_binary(
        source: ArrayView1<'_, u8>,
        destination: ArrayView1<'_, u8>,
        hist_len: usize,
    ) -> Result<DiscreteTransferEntropy> {
        validate_binary("destination", destination)?;
        validate_binary("source", source)?;
        validate_history(hist_len, destination.len().min(source.len()))?;
        Ok(DiscreteTransferEntropy::new(
            source,
            destination,
            hist_len,
            hist_len,
        ))
    }
}

/// Information flow from `ys` to `xs` with history length `hist_len`, in bits.
///
/// How much `ys`'s past reduces uncertainty about `xs`'s next value beyond what `xs`'s own
/// past already tells.
pub fn transfer_entropy(xs: ArrayView1<'_, u8>, ys: ArrayView1<'_, u8>, hist_len: usize) -> Result<f64> {
    Ok(TransferEntropy::new_binary(ys, xs, hist_len)?.global_value())
}

/// Transfer entropy `ys -> xs` with a permutation test that shuffles `ys`'s histories.
pub fn transfer_entropy_with_significance(
    xs: ArrayView1<'_, u8>,
    ys: ArrayView1<'_, u8>,
    hist_len: usize,
    permutations: usize,
) -> Result<SignificantValue> {
    transfer_entropy_with_rng(xs, ys, hist_len, permutations, &mut rand::thread_rng())
}

/// [`transfer_entropy_with_significance`] drawing surrogates from `rng`.
pub fn transfer_entropy_with_rng<R: Rng + ?Sized>(
    xs: ArrayView1<'_, u8>,
    ys: ArrayView1<'_, u8>,
    hist_len: usize,
    permutations: usize,
    rng: &mut R,
) -> Result<SignificantValue> {
    let estimator = TransferEntropy::new_binary(ys, xs, hist_len)?;
    permutation_test(&estimator, permutations, rng)
}
