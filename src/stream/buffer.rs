use crate::constants::MIN_DISPLAY_BUFFER_SAMPLES;
use crate::error::{FilterError, Result};
use crate::stream::SampleChunk;

/// Ring buffer of filtered samples for display
///
/// Every channel shares one write position, so a chunk is either fully in
/// the buffer or not at all.
#[derive(Debug, Clone)]
pub struct DisplayBuffer {
    channels: Vec<Vec<f32>>,
    capacity: usize,
    write_pos: usize,
    total_written: u64,
    last_timestamp: Option<f64>,
}

impl DisplayBuffer {
    pub fn new(num_channels: usize, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: vec![vec![0.0; capacity]; num_channels],
            capacity,
            write_pos: 0,
            total_written: 0,
            last_timestamp: None,
        }
    }

    /// Buffer long enough for `time_range_secs` at `sample_rate_hz`
    pub fn with_time_range(num_channels: usize, sample_rate_hz: f64, time_range_secs: f64) -> Self {
        let wanted = (time_range_secs * sample_rate_hz).ceil();
        let capacity = if wanted.is_finite() && wanted > 0.0 {
            (wanted as usize).max(MIN_DISPLAY_BUFFER_SAMPLES)
        } else {
            MIN_DISPLAY_BUFFER_SAMPLES
        };
        Self::new(num_channels, capacity)
    }

    /// Append a chunk; only the newest `capacity` samples are kept
    ///
    /// # Errors
    /// Returns `FilterError::ChannelMismatch` for a non-empty chunk with the
    /// wrong channel count.
    pub fn push(&mut self, chunk: &SampleChunk) -> Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }
        if chunk.num_channels() != self.channels.len() {
            return Err(FilterError::ChannelMismatch {
                expected: self.channels.len(),
                actual: chunk.num_channels(),
            });
        }

        let len = chunk.num_samples();
        let skip = len.saturating_sub(self.capacity);
        for (ring, samples) in self.channels.iter_mut().zip(chunk.channels()) {
            let mut pos = (self.write_pos + skip) % self.capacity;
            for &sample in &samples[skip..] {
                ring[pos] = sample;
                pos += 1;
                if pos == self.capacity {
                    pos = 0;
                }
            }
        }

        self.write_pos = (self.write_pos + len) % self.capacity;
        self.total_written += len as u64;
        if let Some(ts) = chunk.last_timestamp() {
            self.last_timestamp = Some(ts);
        }
        Ok(())
    }

    /// Newest `count` samples per channel, oldest first, keeping every `step`-th
    pub fn latest(&self, count: usize, step: usize) -> Vec<Vec<f32>> {
        let count = count.min(self.len());
        let step = step.max(1);
        let start = self.write_pos + self.capacity - count;

        self.channels
            .iter()
            .map(|ring| {
                (0..count)
                    .step_by(step)
                    .map(|i| ring[(start + i) % self.capacity])
                    .collect()
            })
            .collect()
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples currently held per channel
    pub fn len(&self) -> usize {
        self.total_written.min(self.capacity as u64) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.total_written == 0
    }

    /// Samples written since the buffer was created
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(ch0: &[f32]) -> SampleChunk {
        let ch1: Vec<f32> = ch0.iter().map(|x| -x).collect();
        SampleChunk::from_channels(vec![ch0.to_vec(), ch1]).unwrap()
    }

    #[test]
    fn test_capacity_floor() {
        let buffer = DisplayBuffer::with_time_range(1, 10.0, 1.0);
        assert_eq!(buffer.capacity(), MIN_DISPLAY_BUFFER_SAMPLES);
        let buffer = DisplayBuffer::with_time_range(1, 250.0, 30.0);
        assert_eq!(buffer.capacity(), 7500);
    }

    #[test]
    fn test_latest_before_wrap() {
        let mut buffer = DisplayBuffer::new(2, 8);
        buffer.push(&chunk(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(buffer.len(), 3);
        let data = buffer.latest(10, 1);
        assert_eq!(data[0], vec![1.0, 2.0, 3.0]);
        assert_eq!(data[1], vec![-1.0, -2.0, -3.0]);
    }

    #[test]
    fn test_wraps_and_keeps_newest() {
        let mut buffer = DisplayBuffer::new(2, 4);
        buffer.push(&chunk(&[1.0, 2.0, 3.0])).unwrap();
        buffer.push(&chunk(&[4.0, 5.0, 6.0])).unwrap();
        assert_eq!(buffer.total_written(), 6);
        assert_eq!(buffer.latest(4, 1)[0], vec![3.0, 4.0, 5.0, 6.0]);
        assert_eq!(buffer.latest(2, 1)[0], vec![5.0, 6.0]);
    }

    #[test]
    fn test_oversized_chunk() {
        let mut buffer = DisplayBuffer::new(2, 3);
        buffer.push(&chunk(&[1.0, 2.0, 3.0, 4.0, 5.0])).unwrap();
        assert_eq!(buffer.latest(3, 1)[0], vec![3.0, 4.0, 5.0]);
        buffer.push(&chunk(&[6.0])).unwrap();
        assert_eq!(buffer.latest(3, 1)[0], vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_decimation() {
        let mut buffer = DisplayBuffer::new(2, 16);
        buffer
            .push(&chunk(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]))
            .unwrap();
        assert_eq!(buffer.latest(6, 2)[0], vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_empty_and_mismatched_chunks() {
        let mut buffer = DisplayBuffer::new(2, 4);
        buffer.push(&SampleChunk::empty(5)).unwrap();
        assert!(buffer.is_empty());
        let bad = SampleChunk::from_channels(vec![vec![1.0]]).unwrap();
        assert!(buffer.push(&bad).is_err());
        assert!(buffer.is_empty());
    }
}
