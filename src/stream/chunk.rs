use crate::error::{FilterError, Result};

/// Rectangular block of multi-channel samples
///
/// Stored channel-major: `channel(c)[n]` is sample `n` of channel `c`.
/// Timestamps, when present, hold one non-decreasing value per sample.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleChunk {
    channels: Vec<Vec<f32>>,
    timestamps: Vec<f64>,
}

impl SampleChunk {
    /// Chunk with no samples
    pub fn empty(num_channels: usize) -> Self {
        Self {
            channels: vec![Vec::new(); num_channels],
            timestamps: Vec::new(),
        }
    }

    /// Build from per-channel sample vectors
    ///
    /// # Errors
    /// `ChunkShape` if the channels differ in length.
    pub fn from_channels(channels: Vec<Vec<f32>>) -> Result<Self> {
        if let Some(first) = channels.first() {
            let len = first.len();
            if let Some((idx, ch)) = channels.iter().enumerate().find(|(_, c)| c.len() != len) {
                return Err(FilterError::ChunkShape(format!(
                    "channel {} has {} samples, channel 0 has {}",
                    idx,
                    ch.len(),
                    len
                )));
            }
        }
        Ok(Self {
            channels,
            timestamps: Vec::new(),
        })
    }

    /// Build from interleaved frames `[c0, c1, .., c0, c1, ..]`
    ///
    /// # Errors
    /// `ChunkShape` if `data` is not a whole number of frames.
    pub fn from_interleaved(data: &[f32], num_channels: usize) -> Result<Self> {
        if num_channels == 0 {
            return Err(FilterError::ChunkShape("zero channels".to_string()));
        }
        if !data.len().is_multiple_of(num_channels) {
            return Err(FilterError::ChunkShape(format!(
                "{} interleaved samples is not a multiple of {} channels",
                data.len(),
                num_channels
            )));
        }

        let frames = data.len() / num_channels;
        let mut channels = vec![Vec::with_capacity(frames); num_channels];
        for frame in data.chunks_exact(num_channels) {
            for (ch, &sample) in channels.iter_mut().zip(frame) {
                ch.push(sample);
            }
        }
        Ok(Self {
            channels,
            timestamps: Vec::new(),
        })
    }

    /// Attach per-sample timestamps in seconds
    ///
    /// # Errors
    /// `ChunkShape` if the count differs from the sample count or the
    /// timestamps decrease.
    pub fn with_timestamps(mut self, timestamps: Vec<f64>) -> Result<Self> {
        if timestamps.len() != self.num_samples() {
            return Err(FilterError::ChunkShape(format!(
                "{} timestamps for {} samples",
                timestamps.len(),
                self.num_samples()
            )));
        }
        if timestamps.windows(2).any(|w| w[1] < w[0]) {
            return Err(FilterError::ChunkShape("timestamps decrease".to_string()));
        }
        self.timestamps = timestamps;
        Ok(self)
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_samples(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.num_samples() == 0
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub(crate) fn channels_mut(&mut self) -> &mut [Vec<f32>] {
        &mut self.channels
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.timestamps.last().copied()
    }

    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Samples as interleaved frames
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.num_channels() * self.num_samples());
        for n in 0..self.num_samples() {
            for ch in &self.channels {
                out.push(ch[n]);
            }
        }
        out
    }
}
