use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use hound::{WavSpec, WavWriter};

use crate::stream::SampleChunk;

fn float_spec(num_channels: usize, sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: num_channels as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    }
}

/// Write all channels of `chunk` as a 32-bit float WAV file
pub fn save_wav(filename: &str, chunk: &SampleChunk, sample_rate: u32) -> Result<(), hound::Error> {
    let mut writer = WavWriter::create(filename, float_spec(chunk.num_channels(), sample_rate))?;

    for sample in chunk.to_interleaved() {
        writer.write_sample(sample)?;
    }

    writer.finalize()?;
    Ok(())
}

/// Float WAV writer fed one chunk at a time
pub struct ChunkWavWriter {
    writer: WavWriter<BufWriter<File>>,
    num_channels: usize,
}

impl ChunkWavWriter {
    pub fn create<P: AsRef<Path>>(
        path: P,
        num_channels: usize,
        sample_rate: u32,
    ) -> Result<Self, hound::Error> {
        Ok(Self {
            writer: WavWriter::create(path, float_spec(num_channels, sample_rate))?,
            num_channels,
        })
    }

    /// Append a chunk; its channel count must match the file's
    pub fn write_chunk(&mut self, chunk: &SampleChunk) -> Result<(), hound::Error> {
        if chunk.is_empty() {
            return Ok(());
        }
        if chunk.num_channels() != self.num_channels {
            return Err(hound::Error::Unsupported);
        }
        for sample in chunk.to_interleaved() {
            self.writer.write_sample(sample)?;
        }
        Ok(())
    }

    pub fn finalize(self) -> Result<(), hound::Error> {
        self.writer.finalize()
    }
}
