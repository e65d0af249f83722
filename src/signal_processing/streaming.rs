use crate::design::FilterCoefficients;
use crate::error::{FilterError, Result};
use crate::signal_processing::FilterState;
use crate::stream::SampleChunk;

/// Applies one FIR filter to every channel of a chunked stream
///
/// Each channel owns its own [`FilterState`], so channels never mix and a
/// stream filtered chunk by chunk matches the same stream filtered in one
/// call. Empty coefficients make the applier a pass-through.
#[derive(Debug, Clone)]
pub struct StreamingFilterApplier {
    coefficients: FilterCoefficients,
    states: Vec<FilterState>,
}

impl StreamingFilterApplier {
    /// Create an applier for `num_channels` channels with zeroed state
    pub fn new(coefficients: FilterCoefficients, num_channels: usize) -> Self {
        let states = (0..num_channels)
            .map(|_| FilterState::new(coefficients.num_taps()))
            .collect();
        Self {
            coefficients,
            states,
        }
    }

    pub fn coefficients(&self) -> &FilterCoefficients {
        &self.coefficients
    }

    pub fn num_channels(&self) -> usize {
        self.states.len()
    }

    pub fn is_passthrough(&self) -> bool {
        self.coefficients.is_passthrough()
    }

    /// Filter state of one channel, `None` past the last channel
    pub fn state(&self, channel: usize) -> Option<&FilterState> {
        self.states.get(channel)
    }

    /// Filter the next chunk of the stream
    ///
    /// Empty chunks come back empty and leave the state alone.
    ///
    /// # Errors
    /// Returns `FilterError::ChannelMismatch` if a non-empty chunk has a
    /// different channel count than the applier.
    pub fn apply(&mut self, chunk: &SampleChunk) -> Result<SampleChunk> {
        let mut out = chunk.clone();
        self.apply_in_place(&mut out)?;
        Ok(out)
    }

    /// Filter a chunk, overwriting its samples with the filtered ones
    pub fn apply_in_place(&mut self, chunk: &mut SampleChunk) -> Result<()> {
        if chunk.is_empty() || self.is_passthrough() {
            return Ok(());
        }
        if chunk.num_channels() != self.states.len() {
            return Err(FilterError::ChannelMismatch {
                expected: self.states.len(),
                actual: chunk.num_channels(),
            });
        }

        let taps = self.coefficients.taps();
        for (samples, state) in chunk.channels_mut().iter_mut().zip(self.states.iter_mut()) {
            *samples = state.filter(taps, samples);
        }
        Ok(())
    }

    /// Forget all past input on every channel
    pub fn reset(&mut self) {
        for state in &mut self.states {
            state.reset();
        }
    }

    /// Swap in new taps; the old state no longer applies and is discarded
    pub fn replace_coefficients(&mut self, coefficients: FilterCoefficients) {
        let num_channels = self.states.len();
        *self = Self::new(coefficients, num_channels);
    }
}
