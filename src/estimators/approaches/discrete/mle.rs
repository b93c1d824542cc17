use ndarray::Array1;
use std::collections::HashMap;

use crate::estimators::approaches::discrete::discrete_utils::{
    count_frequencies_slice, entropy_bits,
};
use crate::estimators::traits::{GlobalValue, LocalValues};

/// Plug-in (maximum likelihood) Shannon entropy of a code column, in bits.
///
/// H = -Σ p_i log2 p_i with p_i = n_i / N. Each sample's local value is -log2 p(x).
pub struct DiscreteEntropy {
    codes: Vec<u64>,
    counts: HashMap<u64, usize>,
}

impl DiscreteEntropy {
    pub fn new(codes: Vec<u64>) -> Self {
        let counts = count_frequencies_slice(&codes);
        Self { codes, counts }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Number of distinct symbols observed.
    pub fn support(&self) -> usize {
        self.counts.len()
    }
}

impl GlobalValue for DiscreteEntropy {
    fn global_value(&self) -> f64 {
        // Dense, code-ordered summation keeps the value bit-identical across runs.
        entropy_bits(&self.codes)
    }
}

impl LocalValues for DiscreteEntropy {
    fn local_values(&self) -> Array1<f64> {
        let n = self.codes.len() as f64;
        self.codes
            .iter()
            .map(|c| -(self.counts[c] as f64 / n).log2())
            .collect()
    }
}
