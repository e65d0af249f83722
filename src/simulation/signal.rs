use std::f32::consts::PI;

use crate::stream::SampleChunk;

/// One oscillatory component of a synthetic channel
#[derive(Clone, Debug, serde::Deserialize)]
pub struct Rhythm {
    pub freq_hz: f32,
    pub amplitude: f32,
    #[serde(default)]
    pub phase_radians: f32,
}

impl Rhythm {
    pub fn new(freq_hz: f32, amplitude: f32) -> Self {
        Self {
            freq_hz,
            amplitude,
            phase_radians: 0.0,
        }
    }
}

/// Rhythms making up one synthetic channel, plus a constant offset
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct ChannelConfig {
    #[serde(default)]
    pub rhythms: Vec<Rhythm>,
    #[serde(default)]
    pub offset: f32,
}

/// Sum of sinusoids sampled at `sample_rate`
pub fn generate_rhythms(
    rhythms: &[Rhythm],
    offset: f32,
    duration_secs: f32,
    sample_rate: u32,
) -> Vec<f32> {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            offset
                + rhythms
                    .iter()
                    .map(|r| r.amplitude * (2.0 * PI * r.freq_hz * t + r.phase_radians).sin())
                    .sum::<f32>()
        })
        .collect()
}

/// Clean multi-channel signal, one entry of `channels` per output channel
pub fn generate_biosignal(
    channels: &[ChannelConfig],
    duration_secs: f32,
    sample_rate: u32,
) -> SampleChunk {
    let data = channels
        .iter()
        .map(|c| generate_rhythms(&c.rhythms, c.offset, duration_secs, sample_rate))
        .collect();
    SampleChunk::from_channels(data).unwrap_or_default()
}
