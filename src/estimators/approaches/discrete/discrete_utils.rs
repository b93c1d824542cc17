use ndarray::ArrayView1;
use std::collections::HashMap;

use crate::error::{CaimError, Result};

/// Check that `series` is non-empty and only holds the symbols 0 and 1.
pub fn validate_binary(name: &'static str, series: ArrayView1<'_, u8>) -> Result<()> {
    if series.is_empty() {
        return Err(CaimError::invalid(format!("{name} series has length 0")));
    }
    if let Some((index, &value)) = series.iter().enumerate().find(|&(_, &v)| v > 1) {
        return Err(CaimError::NotBinary { name, index, value });
    }
    Ok(())
}

/// Check that two series are aligned sample by sample.
pub fn validate_same_length(xs: ArrayView1<'_, u8>, ys: ArrayView1<'_, u8>) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(CaimError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    Ok(())
}

/// Widen a binary series into a code column.
pub fn to_codes(series: ArrayView1<'_, u8>) -> Vec<u64> {
    series.iter().map(|&v| u64::from(v)).collect()
}

/// Pack two aligned code columns into one: `(a << b_bits) | b`.
pub fn pack_pair(a: &[u64], b: &[u64], b_bits: u32) -> Vec<u64> {
    a.iter().zip(b).map(|(&x, &y)| (x << b_bits) | y).collect()
}

// Heuristic threshold: use dense mode if the code range is small.
const MAX_DENSE_RANGE: u64 = 4096;

/// Count the occurrences of each code.
/// Uses a dense vector for small ranges, otherwise falls back to HashMap.
pub fn count_frequencies_slice(data: &[u64]) -> HashMap<u64, usize> {
    if data.is_empty() {
        return HashMap::new();
    }

    let (min_v, max_v) = code_range(data);
    if max_v - min_v <= MAX_DENSE_RANGE {
        let dense = dense_counts(data, min_v, max_v);
        let mut map = HashMap::with_capacity(dense.len());
        for (i, &cnt) in dense.iter().enumerate() {
            if cnt != 0 {
                map.insert(min_v + i as u64, cnt);
            }
        }
        return map;
    }

    let mut frequency_map = HashMap::new();
    for &value in data.iter() {
        *frequency_map.entry(value).or_insert(0) += 1;
    }
    frequency_map
}

/// Plug-in Shannon entropy of a code column, in bits.
///
/// Counts are never materialised as a map on the dense path: this runs once per
/// surrogate in a permutation test.
pub fn entropy_bits(data: &[u64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let n = data.len() as f64;
    let (min_v, max_v) = code_range(data);
    if max_v - min_v <= MAX_DENSE_RANGE {
        entropy_from_counts(dense_counts(data, min_v, max_v).iter().copied(), n)
    } else {
        entropy_from_counts(count_frequencies_slice(data).into_values(), n)
    }
}

/// Plug-in joint entropy of two aligned code columns, in bits, without materialising the
/// packed `(a << b_bits) | b` column.
pub fn pair_entropy_bits(a: &[u64], b: &[u64], b_bits: u32) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let (min_a, max_a) = code_range(&a[..n]);
    let lo = min_a << b_bits;
    let hi = (max_a << b_bits) | ((1u64 << b_bits) - 1);
    if hi - lo <= MAX_DENSE_RANGE {
        let mut dense = vec![0usize; (hi - lo) as usize + 1];
        for (&x, &y) in a.iter().zip(b) {
            dense[(((x << b_bits) | y) - lo) as usize] += 1;
        }
        return entropy_from_counts(dense.iter().copied(), n as f64);
    }

    let mut frequency_map: HashMap<u64, usize> = HashMap::new();
    for (&x, &y) in a.iter().zip(b) {
        *frequency_map.entry((x << b_bits) | y).or_insert(0) += 1;
    }
    entropy_from_counts(frequency_map.into_values(), n as f64)
}

/// `-sum p log2 p` over counts; zero counts contribute nothing.
pub fn entropy_from_counts(counts: impl IntoIterator<Item = usize>, n: f64) -> f64 {
    let mut h = 0.0_f64;
    for cnt in counts {
        if cnt != 0 {
            let p = cnt as f64 / n;
            h -= p * p.log2();
        }
    }
    h
}

fn code_range(data: &[u64]) -> (u64, u64) {
    let mut min_v = u64::MAX;
    let mut max_v = u64::MIN;
    for &v in data.iter() {
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    (min_v, max_v)
}

fn dense_counts(data: &[u64], min_v: u64, max_v: u64) -> Vec<usize> {
    let mut dense = vec![0usize; (max_v - min_v) as usize + 1];
    for &v in data.iter() {
        dense[(v - min_v) as usize] += 1;
    }
    dense
}
