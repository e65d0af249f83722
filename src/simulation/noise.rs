use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::f32::consts::PI;

/// Artifacts added on top of a clean synthetic channel
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    pub additive: Option<AdditiveNoiseConfig>,
    pub line: Option<LineNoiseConfig>,
    pub drift: Option<DriftConfig>,
    pub impulse: Option<ImpulseNoiseConfig>,
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_awgn(mut self, snr_db: f32) -> Self {
        self.additive = Some(AdditiveNoiseConfig { snr_db });
        self
    }

    pub fn with_line_noise(mut self, freq_hz: f32, amplitude: f32) -> Self {
        self.line = Some(LineNoiseConfig { freq_hz, amplitude });
        self
    }

    pub fn with_drift(mut self, amplitude: f32, period_secs: f32) -> Self {
        self.drift = Some(DriftConfig {
            amplitude,
            period_secs,
        });
        self
    }

    pub fn with_impulse(mut self, rate_hz: f32, amplitude: f32, duration_samples: usize) -> Self {
        self.impulse = Some(ImpulseNoiseConfig {
            rate_hz,
            amplitude,
            duration_samples,
        });
        self
    }
}

/// White Gaussian noise at a signal-to-noise ratio
#[derive(Clone, Debug, serde::Deserialize)]
pub struct AdditiveNoiseConfig {
    pub snr_db: f32,
}

/// Mains interference
#[derive(Clone, Debug, serde::Deserialize)]
pub struct LineNoiseConfig {
    pub freq_hz: f32,
    pub amplitude: f32,
}

/// Slow baseline wander (electrode drift)
#[derive(Clone, Debug, serde::Deserialize)]
pub struct DriftConfig {
    pub amplitude: f32,
    pub period_secs: f32,
}

/// Short bursts such as movement artifacts
#[derive(Clone, Debug, serde::Deserialize)]
pub struct ImpulseNoiseConfig {
    pub rate_hz: f32,
    pub amplitude: f32,
    pub duration_samples: usize,
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

pub fn signal_power(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|&x| x * x).sum::<f32>() / signal.len() as f32
}

fn apply_additive_noise(signal: &mut [f32], config: &AdditiveNoiseConfig, rng: &mut ChaCha8Rng) {
    let sig_power = signal_power(signal);
    if sig_power == 0.0 {
        return;
    }

    let snr_linear = 10.0_f32.powf(config.snr_db / 10.0);
    let noise_std = (sig_power / snr_linear).sqrt();

    let Ok(normal) = Normal::new(0.0, noise_std as f64) else {
        return;
    };

    for sample in signal.iter_mut() {
        *sample += normal.sample(rng) as f32;
    }
}

fn apply_line_noise(signal: &mut [f32], config: &LineNoiseConfig, sample_rate: f32) {
    for (i, sample) in signal.iter_mut().enumerate() {
        let t = i as f32 / sample_rate;
        *sample += config.amplitude * (2.0 * PI * config.freq_hz * t).sin();
    }
}

fn apply_drift(signal: &mut [f32], config: &DriftConfig, sample_rate: f32) {
    if config.period_secs <= 0.0 {
        return;
    }
    for (i, sample) in signal.iter_mut().enumerate() {
        let t = i as f32 / sample_rate;
        *sample += config.amplitude * (2.0 * PI * t / config.period_secs).sin();
    }
}

fn apply_impulse_noise(
    signal: &mut [f32],
    config: &ImpulseNoiseConfig,
    sample_rate: f32,
    rng: &mut ChaCha8Rng,
) {
    if config.rate_hz <= 0.0 {
        return;
    }

    let avg_samples_between_impulses = sample_rate / config.rate_hz;
    let mut pos = 0usize;

    loop {
        let interval = (rng.random::<f32>() * 2.0 * avg_samples_between_impulses) as usize;
        pos += interval.max(1);
        if pos >= signal.len() {
            break;
        }

        let sign = if rng.random::<bool>() { 1.0 } else { -1.0 };
        let end = (pos + config.duration_samples).min(signal.len());
        for sample in &mut signal[pos..end] {
            *sample += sign * config.amplitude;
        }
    }
}

pub fn apply_noise(clean_signal: &[f32], config: &NoiseConfig, sample_rate: f32) -> Vec<f32> {
    let mut signal = clean_signal.to_vec();
    let mut rng = create_rng(config.seed);

    if let Some(ref drift_config) = config.drift {
        apply_drift(&mut signal, drift_config, sample_rate);
    }

    if let Some(ref line_config) = config.line {
        apply_line_noise(&mut signal, line_config, sample_rate);
    }

    if let Some(ref additive_config) = config.additive {
        apply_additive_noise(&mut signal, additive_config, &mut rng);
    }

    if let Some(ref impulse_config) = config.impulse {
        apply_impulse_noise(&mut signal, impulse_config, sample_rate, &mut rng);
    }

    signal
}

/// Synthetic biosignal with noise; channel `c` uses seed `seed + c`
pub fn generate_noisy_biosignal(
    channels: &[super::ChannelConfig],
    duration_secs: f32,
    sample_rate: u32,
    noise_config: &NoiseConfig,
) -> crate::stream::SampleChunk {
    let clean = super::generate_biosignal(channels, duration_secs, sample_rate);
    let noisy = clean
        .channels()
        .iter()
        .enumerate()
        .map(|(c, samples)| {
            let config = NoiseConfig {
                seed: noise_config.seed.map(|s| s.wrapping_add(c as u64)),
                ..noise_config.clone()
            };
            apply_noise(samples, &config, sample_rate as f32)
        })
        .collect();
    crate::stream::SampleChunk::from_channels(noisy).unwrap_or_default()
}
