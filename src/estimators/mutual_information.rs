use ndarray::ArrayView1;
use rand::Rng;

use crate::error::Result;
use crate::estimators::approaches::discrete::DiscreteMutualInformation;
use crate::estimators::approaches::discrete::discrete_utils::{validate_binary, validate_same_length};
use crate::estimators::significance::{SignificantValue, permutation_test};
use crate::estimators::traits::GlobalValue;

pub struct MutualInformation;

impl MutualInformation {
    /// Create a plug-in mutual information estimator for two aligned binary series.
    ///
    /// # Errors
    /// `InvalidInput` for empty series, `LengthMismatch` for unequal lengths, `NotBinary`
    /// if a value other than 0 or 1 is present.
    pub fn new_binary(
        xs: ArrayView1<'_, u8>,
        ys: ArrayView1<'_, u8>,
    ) -> Result<DiscreteMutualInformation> {
        validate_same_length(xs, ys)?;
        validate_binary("xs", xs)?;
        validate_binary("ys", ys)?;
        Ok(DiscreteMutualInformation::from_binary(xs, ys))
    }
}

/// Mutual information between two binary series, in bits.
pub fn mutual_information(xs: ArrayView1<'_, u8>, ys: ArrayView1<'_, u8>) -> Result<f64> {
    Ok(MutualInformation::new_binary(xs, ys)?.global_value())
}

/// Mutual information with a one-sided permutation test that shuffles `ys`.
pub fn mutual_information_with_significance(
    xs: ArrayView1<'_, u8>,
    ys: ArrayView1<'_, u8>,
    permutations: usize,
) -> Result<SignificantValue> {
    mutual_information_with_rng(xs, ys, permutations, &mut rand::thread_rng())
}

/// [`mutual_information_with_significance`] drawing surrogates from `rng`.
pub fn mutual_information_with_rng<R: Rng + ?Sized>(
    xs: ArrayView1<'_, u8>,
    ys: ArrayView1<'_, u8>,
    permutations: usize,
    rng: &mut R,
) -> Result<SignificantValue> {
    let estimator = MutualInformation::new_binary(xs, ys)?;
    permutation_test(&estimator, permutations, rng)
}
