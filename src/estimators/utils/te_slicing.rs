use ndarray::ArrayView1;

/// History-embedded observations for AI / TE estimation.
///
/// Row `i` corresponds to time `t = max_delay + i`:
/// - `dest_future[i]`  = `destination[t]`
/// - `dest_history[i]` = `destination[t - dest_hist_len .. t]` packed into an integer
/// - `src_history[i]`  = `source[t - src_hist_len .. t]` packed into an integer
///
/// Histories are packed with the oldest sample in the most significant bit, so a history
/// of length `k` occupies the low `k` bits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryObservations {
    pub dest_future: Vec<u64>,
    pub dest_history: Vec<u64>,
    pub src_history: Vec<u64>,
}

impl HistoryObservations {
    pub fn len(&self) -> usize {
        self.dest_future.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dest_future.is_empty()
    }
}

/// Pack a window of binary symbols into an integer code (first element most significant).
pub fn encode_history<'a>(window: impl IntoIterator<Item = &'a u8>) -> u64 {
    window
        .into_iter()
        .fold(0u64, |code, &bit| (code << 1) | u64::from(bit))
}

/// Slice source and destination series into future and history codes for TE.
///
/// Returns empty observations if the longest history does not leave at least one future
/// sample. Both series are read up to the destination's length.
pub fn te_observations(
    source: ArrayView1<'_, u8>,
    destination: ArrayView1<'_, u8>,
    src_hist_len: usize,
    dest_hist_len: usize,
) -> HistoryObservations {
    let max_delay = src_hist_len.max(dest_hist_len);
    let n = destination.len().min(source.len());

    if max_delay >= n {
        return HistoryObservations::default();
    }

    let n_samples = n - max_delay;
    let mut obs = HistoryObservations {
        dest_future: Vec::with_capacity(n_samples),
        dest_history: Vec::with_capacity(n_samples),
        src_history: Vec::with_capacity(n_samples),
    };

    for t in max_delay..n {
        obs.dest_future.push(u64::from(destination[t]));
        obs.dest_history
            .push(encode_history(destination.slice(ndarray::s![t - dest_hist_len..t]).iter()));
        obs.src_history
            .push(encode_history(source.slice(ndarray::s![t - src_hist_len..t]).iter()));
    }

    obs
}

/// Slice a single series into (future, history) codes for active information.
pub fn ai_observations(series: ArrayView1<'_, u8>, hist_len: usize) -> (Vec<u64>, Vec<u64>) {
    let obs = te_observations(series, series, 0, hist_len);
    (obs.dest_future, obs.dest_history)
}
