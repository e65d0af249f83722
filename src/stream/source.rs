use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crossbeam_channel::{Receiver, Sender};
use hound::WavReader;

use crate::stream::SampleChunk;

/// Something that hands out consecutive chunks of a multi-channel stream
pub trait ChunkSource: Send {
    /// Next chunk, or `None` once the stream has ended
    fn next_chunk(&mut self) -> anyhow::Result<Option<SampleChunk>>;
    /// Nominal sample rate in Hz (0 for irregular streams)
    fn sample_rate(&self) -> f64;
    fn num_channels(&self) -> usize;
}

/// Chunks produced elsewhere (e.g. an acquisition thread) and sent over a channel
pub struct ChannelSource {
    rx: Receiver<SampleChunk>,
    sample_rate: f64,
    num_channels: usize,
}

impl ChannelSource {
    /// Create a bounded channel and the source reading from it
    pub fn bounded(
        capacity: usize,
        sample_rate: f64,
        num_channels: usize,
    ) -> (Sender<SampleChunk>, Self) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (
            tx,
            Self {
                rx,
                sample_rate,
                num_channels,
            },
        )
    }
}

impl ChunkSource for ChannelSource {
    fn next_chunk(&mut self) -> anyhow::Result<Option<SampleChunk>> {
        match self.rx.recv() {
            Ok(chunk) => Ok(Some(chunk)),
            Err(_) => Ok(None),
        }
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn num_channels(&self) -> usize {
        self.num_channels
    }
}

/// Multi-channel WAV file replayed as a stream of fixed-size chunks
///
/// Each chunk carries timestamps derived from the sample position.
pub struct WavFileSource {
    samples: Vec<f32>,
    num_channels: usize,
    position: usize,
    chunk_frames: usize,
    sample_rate: u32,
}

impl WavFileSource {
    pub fn new<P: AsRef<Path>>(path: P, chunk_frames: usize) -> anyhow::Result<Self> {
        let reader = WavReader::open(path.as_ref())?;
        let spec = reader.spec();

        if spec.channels == 0 {
            anyhow::bail!("WAV file has no channels");
        }
        if chunk_frames == 0 {
            anyhow::bail!("chunk size must be at least one frame");
        }

        let samples = Self::read_samples(reader, &spec)?;
        log::debug!(
            "Opened {}: {} channels @ {} Hz, {} frames",
            path.as_ref().display(),
            spec.channels,
            spec.sample_rate,
            samples.len() / spec.channels as usize
        );

        Ok(Self {
            samples,
            num_channels: spec.channels as usize,
            position: 0,
            chunk_frames,
            sample_rate: spec.sample_rate,
        })
    }

    fn read_samples(
        mut reader: WavReader<BufReader<File>>,
        spec: &hound::WavSpec,
    ) -> anyhow::Result<Vec<f32>> {
        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let max_val = 2_i64.pow(spec.bits_per_sample as u32 - 1) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_val))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(samples)
    }

    /// Total frames in the file
    pub fn num_frames(&self) -> usize {
        self.samples.len() / self.num_channels
    }
}

impl ChunkSource for WavFileSource {
    fn next_chunk(&mut self) -> anyhow::Result<Option<SampleChunk>> {
        let frame_len = self.num_channels;
        let end_of_frames = self.samples.len() - self.samples.len() % frame_len;
        if self.position >= end_of_frames {
            return Ok(None);
        }

        let end = (self.position + self.chunk_frames * frame_len).min(end_of_frames);
        let first_frame = self.position / frame_len;
        let chunk = SampleChunk::from_interleaved(&self.samples[self.position..end], frame_len)?;
        let rate = self.sample_rate as f64;
        let timestamps = (first_frame..first_frame + chunk.num_samples())
            .map(|i| i as f64 / rate)
            .collect();
        self.position = end;

        Ok(Some(chunk.with_timestamps(timestamps)?))
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate as f64
    }

    fn num_channels(&self) -> usize {
        self.num_channels
    }
}
