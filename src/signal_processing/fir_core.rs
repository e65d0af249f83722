/// Input history carried by one channel between chunks
///
/// Holds the most recent `taps - 1` input samples, oldest first, so the next
/// chunk's first outputs can reach back across the chunk boundary. Starts
/// zeroed, which is the same as the stream being preceded by silence.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    history: Vec<f32>,
}

impl FilterState {
    /// Create a zeroed state for a filter with `num_taps` taps
    pub fn new(num_taps: usize) -> Self {
        Self {
            history: vec![0.0; num_taps.saturating_sub(1)],
        }
    }

    /// Retained input samples, oldest first
    pub fn history(&self) -> &[f32] {
        &self.history
    }

    /// Forget all past input
    pub fn reset(&mut self) {
        self.history.fill(0.0);
    }

    /// Causally convolve `input` with `taps`, continuing from the retained history
    ///
    /// Computes `y[n] = sum(taps[k] * x[n - k])` where `x` is the history
    /// followed by `input`, then keeps the last `taps.len() - 1` samples of
    /// `x` as the new history. Accumulation is in f64 and always runs over
    /// the taps in order, so splitting a stream into chunks does not change
    /// the result. `taps` must be the filter this state was created for.
    pub(crate) fn filter(&mut self, taps: &[f64], input: &[f32]) -> Vec<f32> {
        let hist_len = self.history.len();
        debug_assert_eq!(hist_len + 1, taps.len());

        if input.is_empty() {
            return Vec::new();
        }

        let mut extended = Vec::with_capacity(hist_len + input.len());
        extended.extend_from_slice(&self.history);
        extended.extend_from_slice(input);

        let output = (0..input.len())
            .map(|n| {
                let newest = hist_len + n;
                let mut acc = 0.0f64;
                for (k, &tap) in taps.iter().enumerate() {
                    acc += tap * extended[newest - k] as f64;
                }
                acc as f32
            })
            .collect();

        self.history.copy_from_slice(&extended[extended.len() - hist_len..]);
        output
    }
}
