//! Synthetic multi-channel biosignals for tests and demo files.

mod noise;
mod signal;

pub use noise::{
    AdditiveNoiseConfig, DriftConfig, ImpulseNoiseConfig, LineNoiseConfig, NoiseConfig,
    apply_noise, generate_noisy_biosignal, signal_power,
};
pub use signal::{ChannelConfig, Rhythm, generate_biosignal, generate_rhythms};
