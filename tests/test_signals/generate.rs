use std::f32::consts::PI;

use bioscope::stream::SampleChunk;

/// Unit sine at `freq_hz`
pub fn sine(freq_hz: f32, sample_rate: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| (2.0 * PI * freq_hz * i as f32 / sample_rate).sin())
        .collect()
}

/// One channel per entry, each the sum of its unit sines
pub fn mixed_tones(freqs_per_channel: &[&[f32]], sample_rate: f32, num_samples: usize) -> SampleChunk {
    let channels = freqs_per_channel
        .iter()
        .map(|freqs| {
            let mut samples = vec![0.0f32; num_samples];
            for &f in freqs.iter() {
                for (s, x) in samples.iter_mut().zip(sine(f, sample_rate, num_samples)) {
                    *s += x;
                }
            }
            samples
        })
        .collect();
    SampleChunk::from_channels(channels).expect("tone channels have equal length")
}

pub fn impulse(num_samples: usize) -> Vec<f32> {
    let mut samples = vec![0.0; num_samples];
    if let Some(first) = samples.first_mut() {
        *first = 1.0;
    }
    samples
}

pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|&x| x * x).sum::<f32>() / samples.len() as f32).sqrt()
}
